//! Plain and sealed key-value rows

use crate::encryption::SealedSecret;
use chrono::Utc;
use portfoliox_core::{Error, Result};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct SecretRow {
    ciphertext: Vec<u8>,
    iv: Vec<u8>,
}

pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(value.map(|(v,)| v))
}

/// Insert or replace
pub async fn put_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

pub async fn get_secret(pool: &SqlitePool, key: &str) -> Result<Option<SealedSecret>> {
    let row: Option<SecretRow> =
        sqlx::query_as("SELECT ciphertext, iv FROM secrets WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

    row.map(|r| SealedSecret::from_parts(r.ciphertext, &r.iv))
        .transpose()
}

pub async fn put_secret(pool: &SqlitePool, key: &str, sealed: &SealedSecret) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO secrets (key, ciphertext, iv, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            ciphertext = excluded.ciphertext,
            iv = excluded.iv,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(&sealed.ciphertext)
    .bind(&sealed.iv[..])
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Remove every stored key; returns how many rows went away
pub async fn clear_all(pool: &SqlitePool) -> Result<u64> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let settings = sqlx::query("DELETE FROM settings")
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?
        .rows_affected();
    let secrets = sqlx::query("DELETE FROM secrets")
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?
        .rows_affected();

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(settings + secrets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::Database;

    #[tokio::test]
    async fn test_put_overwrites() {
        let db = Database::connect_in_memory().await.unwrap();
        assert_eq!(get_setting(db.pool(), "apiBaseUrl").await.unwrap(), None);

        put_setting(db.pool(), "apiBaseUrl", "http://a").await.unwrap();
        put_setting(db.pool(), "apiBaseUrl", "http://b").await.unwrap();
        assert_eq!(
            get_setting(db.pool(), "apiBaseUrl").await.unwrap().as_deref(),
            Some("http://b")
        );
    }

    #[tokio::test]
    async fn test_secret_row() {
        let db = Database::connect_in_memory().await.unwrap();
        let sealed = SealedSecret {
            ciphertext: vec![9, 8, 7],
            iv: [1u8; 12],
        };
        put_secret(db.pool(), "apiToken", &sealed).await.unwrap();
        assert_eq!(get_secret(db.pool(), "apiToken").await.unwrap(), Some(sealed));
        assert_eq!(get_secret(db.pool(), "apiBaseUrl").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_all_counts_rows() {
        let db = Database::connect_in_memory().await.unwrap();
        put_setting(db.pool(), "a", "1").await.unwrap();
        put_setting(db.pool(), "b", "2").await.unwrap();
        put_secret(
            db.pool(),
            "c",
            &SealedSecret {
                ciphertext: vec![0],
                iv: [0u8; 12],
            },
        )
        .await
        .unwrap();

        assert_eq!(clear_all(db.pool()).await.unwrap(), 3);
        assert_eq!(clear_all(db.pool()).await.unwrap(), 0);
    }
}
