use crate::models::{round_to, Unit};
use std::collections::HashMap;

/// Floating noise tolerated before rounding up to the next whole unit
const CEIL_TOLERANCE: f64 = 1e-9;

/// How an aggregated quantity becomes a purchasable quantity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundingRule {
    /// Round to the given number of decimal places (loose goods sold by weight or volume)
    Decimals(i32),
    /// Round up to the next whole item
    CeilWhole,
}

impl RoundingRule {
    pub fn apply(&self, quantity: f64) -> f64 {
        match self {
            RoundingRule::Decimals(places) => round_to(quantity, *places),
            RoundingRule::CeilWhole => {
                if quantity <= CEIL_TOLERANCE {
                    0.0
                } else {
                    (quantity - CEIL_TOLERANCE).ceil()
                }
            }
        }
    }
}

/// Unit → rounding rule table
///
/// Units without an explicit entry use the fallback rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundingPolicy {
    rules: HashMap<Unit, RoundingRule>,
    fallback: RoundingRule,
}

impl RoundingPolicy {
    /// Kilograms to one decimal place, everything else rounded up to whole units
    pub fn standard() -> Self {
        Self {
            rules: HashMap::from([(Unit::Kg, RoundingRule::Decimals(1))]),
            fallback: RoundingRule::CeilWhole,
        }
    }

    /// Register or replace the rule for `unit`
    pub fn with_rule(mut self, unit: Unit, rule: RoundingRule) -> Self {
        self.rules.insert(unit, rule);
        self
    }

    pub fn with_fallback(mut self, rule: RoundingRule) -> Self {
        self.fallback = rule;
        self
    }

    pub fn rule_for(&self, unit: Unit) -> RoundingRule {
        self.rules.get(&unit).copied().unwrap_or(self.fallback)
    }

    pub fn round(&self, unit: Unit, quantity: f64) -> f64 {
        self.rule_for(unit).apply(quantity)
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
