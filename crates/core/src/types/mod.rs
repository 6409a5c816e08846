//! Shared type definitions used across view-models

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP verbs the backend gateway issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign class for gains and returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GainClass {
    Positive,
    Negative,
}

impl GainClass {
    /// Zero counts as positive
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            GainClass::Positive
        } else {
            GainClass::Negative
        }
    }
}

/// Health tier derived from the backend's 0-100 health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Good,
    Warning,
    Danger,
}

impl HealthTier {
    /// Ordered thresholds, first match wins
    pub fn classify(score: f64) -> Self {
        if score >= 70.0 {
            HealthTier::Good
        } else if score >= 40.0 {
            HealthTier::Warning
        } else {
            HealthTier::Danger
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthTier::Good => "good",
            HealthTier::Warning => "warning",
            HealthTier::Danger => "danger",
        }
    }
}

/// Visual severity attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Neutral,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Neutral => "neutral",
        }
    }
}

/// Active/inactive badge on a portfolio card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioStatus {
    Active,
    Inactive,
}

impl PortfolioStatus {
    pub fn from_flag(is_active: bool) -> Self {
        if is_active {
            PortfolioStatus::Active
        } else {
            PortfolioStatus::Inactive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PortfolioStatus::Active => "Active",
            PortfolioStatus::Inactive => "Inactive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_tier_boundaries() {
        assert_eq!(HealthTier::classify(70.0), HealthTier::Good);
        assert_eq!(HealthTier::classify(69.999), HealthTier::Warning);
        assert_eq!(HealthTier::classify(40.0), HealthTier::Warning);
        assert_eq!(HealthTier::classify(39.999), HealthTier::Danger);
        assert_eq!(HealthTier::classify(0.0), HealthTier::Danger);
        assert_eq!(HealthTier::classify(100.0), HealthTier::Good);
    }

    #[test]
    fn test_gain_class_zero_is_positive() {
        assert_eq!(GainClass::of(0.0), GainClass::Positive);
        assert_eq!(GainClass::of(-0.01), GainClass::Negative);
    }
}
