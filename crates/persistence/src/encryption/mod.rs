//! AES-256-GCM sealing for the API token
//!
//! The key is derived with Argon2id from a machine fingerprint, so a copied
//! database cannot be opened on another host.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::Argon2;
use portfoliox_core::{Error, Result};
use rand::RngCore;

const NONCE_LEN: usize = 12;
const MACHINE_SALT: &[u8] = b"portfoliox-client-machine-salt-v1";
const PASSPHRASE_SALT: &[u8] = b"portfoliox-client-passphrase-v1";

/// Ciphertext plus the nonce it was sealed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; NONCE_LEN],
}

impl SealedSecret {
    /// Rebuild from stored columns; the IV must be exactly 12 bytes
    pub fn from_parts(ciphertext: Vec<u8>, iv: &[u8]) -> Result<Self> {
        let iv: [u8; NONCE_LEN] = iv.try_into().map_err(|_| {
            Error::EncryptionError(format!("IV must be {} bytes, got {}", NONCE_LEN, iv.len()))
        })?;
        Ok(Self { ciphertext, iv })
    }
}

pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl SecretCipher {
    /// `key` must be 32 bytes
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != 32 {
            return Err(Error::EncryptionError(format!(
                "Key must be 32 bytes, got {}",
                key.len()
            )));
        }
        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|e| Error::EncryptionError(e.to_string()))?;
        Ok(Self { cipher })
    }

    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        let key = stretch(passphrase, PASSPHRASE_SALT)?;
        Self::new(&key)
    }

    /// Cipher bound to this machine
    pub fn for_this_machine() -> Result<Self> {
        Self::new(&derive_machine_key()?)
    }

    /// Fresh random nonce on every call
    pub fn seal(&self, plaintext: &str) -> Result<SealedSecret> {
        let mut iv = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|e| Error::EncryptionError(e.to_string()))?;

        Ok(SealedSecret { ciphertext, iv })
    }

    pub fn open(&self, sealed: &SealedSecret) -> Result<String> {
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&sealed.iv), sealed.ciphertext.as_ref())
            .map_err(|e| Error::EncryptionError(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| Error::EncryptionError(e.to_string()))
    }
}

fn stretch(input: &str, salt: &[u8]) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(input.as_bytes(), salt, &mut key)
        .map_err(|e| Error::EncryptionError(format!("Argon2 key derivation failed: {}", e)))?;
    Ok(key)
}

/// Machine id plus host name
pub fn machine_fingerprint() -> String {
    let machine_id = machine_uid::get().unwrap_or_else(|_| "no-machine-id".to_string());
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown-host".to_string());
    format!("portfoliox:{}:{}", machine_id, host)
}

/// 32-byte key, stable for this machine
pub fn derive_machine_key() -> Result<[u8; 32]> {
    stretch(&machine_fingerprint(), MACHINE_SALT)
}
