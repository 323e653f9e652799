//! Request validation
//!
//! Phone numbers are checked against a per-country dialing prefix table.
//! The table is plain data so deployments can extend it from configuration.

use serde::{Deserialize, Serialize};

/// Dialing prefix used for countries without a rule
pub const DEFAULT_PHONE_PREFIX: &str = "+1";

/// Required dialing prefix for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRule {
    /// Country name, compared case-insensitively
    pub country: String,
    /// Prefix the number must start with
    pub prefix: String,
}

impl PhoneRule {
    pub fn new(country: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            prefix: prefix.into(),
        }
    }
}

/// Built-in rule table
pub fn default_phone_rules() -> Vec<PhoneRule> {
    vec![PhoneRule::new("india", "+91")]
}

/// Phone number rule table with a fallback prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRules {
    rules: Vec<PhoneRule>,
    default_prefix: String,
}

impl Default for PhoneRules {
    fn default() -> Self {
        Self::new(default_phone_rules(), DEFAULT_PHONE_PREFIX)
    }
}

impl PhoneRules {
    pub fn new(rules: Vec<PhoneRule>, default_prefix: impl Into<String>) -> Self {
        Self {
            rules,
            default_prefix: default_prefix.into(),
        }
    }

    /// Prefix required for `country`; names must match exactly apart from case
    pub fn prefix_for(&self, country: &str) -> &str {
        let country = country.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.country.to_lowercase() == country)
            .map_or(self.default_prefix.as_str(), |rule| rule.prefix.as_str())
    }

    /// An empty number is always valid; otherwise it must start with the
    /// country's prefix.
    pub fn validate(&self, country: &str, number: &str) -> bool {
        number.is_empty() || number.starts_with(self.prefix_for(country))
    }
}

/// Validate against the built-in rule table
pub fn validate_phone_number(country: &str, number: &str) -> bool {
    PhoneRules::default().validate(country, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_number_is_valid() {
        assert!(validate_phone_number("India", ""));
        assert!(validate_phone_number("", ""));
    }

    #[test]
    fn test_india_requires_plus_91() {
        assert!(validate_phone_number("India", "+919999999999"));
        assert!(validate_phone_number("INDIA", "+919999999999"));
        assert!(!validate_phone_number("India", "919999999999"));
        assert!(!validate_phone_number("India", "+14155550100"));
    }

    #[test]
    fn test_padded_country_falls_back_to_default_prefix() {
        assert!(!validate_phone_number(" India ", "+919999999999"));
        assert!(validate_phone_number(" India ", "+14155550100"));
    }

    #[test]
    fn test_other_countries_use_default_prefix() {
        assert!(validate_phone_number("USA", "+14155550100"));
        assert!(!validate_phone_number("usa", "04155550100"));
        assert!(validate_phone_number("", "+1 212 555 0100"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = PhoneRules::new(
            vec![PhoneRule::new("india", "+91"), PhoneRule::new("United Kingdom", "+44")],
            "+1",
        );
        assert_eq!(rules.prefix_for("united kingdom"), "+44");
        assert!(rules.validate("United Kingdom", "+447700900123"));
        assert!(!rules.validate("United Kingdom", "+17700900123"));
        assert_eq!(rules.prefix_for("Canada"), "+1");
    }
}
