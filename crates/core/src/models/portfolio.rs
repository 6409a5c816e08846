//! Portfolio-related models

use super::lenient;
use serde::{Deserialize, Serialize};

/// One portfolio as returned by `GET /portfolios/` and `GET /portfolios/{id}/`
///
/// Numeric fields are defaulted to 0 at decode time, so arithmetic over a
/// collection never has to special-case missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub current_value: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_invested: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_gain_loss: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_gain_pct: f64,
    #[serde(default, deserialize_with = "lenient::bool_or_false")]
    pub is_active: bool,
}

impl PortfolioSummary {
    /// Description shown in lists, with the placeholder for empty values
    pub fn display_description(&self) -> &str {
        match self.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d,
            _ => "No description",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_strings_and_nulls() {
        let json = r#"{
            "id": 3,
            "name": "Growth",
            "description": null,
            "current_value": "1000.00",
            "total_invested": 800,
            "total_gain_loss": null,
            "is_active": true
        }"#;
        let p: PortfolioSummary = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, 3);
        assert_eq!(p.current_value, 1000.0);
        assert_eq!(p.total_invested, 800.0);
        assert_eq!(p.total_gain_loss, 0.0);
        assert_eq!(p.total_gain_pct, 0.0);
        assert!(p.is_active);
        assert_eq!(p.display_description(), "No description");
    }

    #[test]
    fn test_minimal_record() {
        let p: PortfolioSummary = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(p.name, "");
        assert!(!p.is_active);
        assert_eq!(p.current_value, 0.0);
    }
}
