use crate::error::CateringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Purchasable unit an ingredient is priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Weight, priced per kilogram
    Kg,
    /// Volume, priced per litre
    L,
    Whole,
    Pack,
    Bunch,
    Single,
    /// Feed could not classify the product
    Unknown,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Kg,
        Unit::L,
        Unit::Whole,
        Unit::Pack,
        Unit::Bunch,
        Unit::Single,
        Unit::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::L => "l",
            Unit::Whole => "whole",
            Unit::Pack => "pack",
            Unit::Bunch => "bunch",
            Unit::Single => "single",
            Unit::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = CateringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == wanted)
            .ok_or_else(|| CateringError::Format(format!("unknown unit '{}'", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_case_insensitive() {
        assert_eq!("KG".parse::<Unit>().unwrap(), Unit::Kg);
        assert_eq!(" whole ".parse::<Unit>().unwrap(), Unit::Whole);
        assert!("bottle".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_serde_lowercase() {
        let json = serde_json::to_string(&Unit::Bunch).unwrap();
        assert_eq!(json, "\"bunch\"");
        let unit: Unit = serde_json::from_str("\"l\"").unwrap();
        assert_eq!(unit, Unit::L);
    }
}
