//! Numeric decoding that tolerates the backend's decimal encodings
//!
//! The backend serializes decimal fields as strings ("1000.00") while
//! computed analytics arrive as JSON numbers or null. Every numeric field
//! goes through these helpers so defaulting happens once, at the boundary.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    fn into_f64(self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(n),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            RawNumber::Other(_) => None,
        }
    }
}

/// Number, numeric string or null; anything unreadable becomes `None`
pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(RawNumber::into_f64))
}

/// Same as [`f64_opt`] but collapses missing values to 0
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64_opt(deserializer)?.unwrap_or(0.0))
}

/// Booleans sometimes arrive as 0/1 or "true"/"false"
pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::f64_or_zero")]
        value: f64,
        #[serde(default, deserialize_with = "super::f64_opt")]
        maybe: Option<f64>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        assert_eq!(probe(r#"{"value": 12.5}"#).value, 12.5);
        assert_eq!(probe(r#"{"value": 7}"#).value, 7.0);
        assert_eq!(probe(r#"{"value": "1000.00"}"#).value, 1000.0);
    }

    #[test]
    fn test_missing_null_and_garbage_default() {
        assert_eq!(probe(r#"{}"#).value, 0.0);
        assert_eq!(probe(r#"{"value": null}"#).value, 0.0);
        assert_eq!(probe(r#"{"value": "n/a"}"#).value, 0.0);
        assert_eq!(probe(r#"{"value": [1]}"#).value, 0.0);
        assert_eq!(probe(r#"{"maybe": null}"#).maybe, None);
        assert_eq!(probe(r#"{"maybe": "-3.5"}"#).maybe, Some(-3.5));
    }
}
