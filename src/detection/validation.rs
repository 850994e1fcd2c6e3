//! Validation filters applied to pattern matches
//!
//! Each entity kind may register one structural rule. A match that fails its
//! rule is dropped before it becomes a candidate; rejection is an ordinary
//! `false`, never an error.

use crate::domain::{EntityKind, RedactorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Structural predicate over matched text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// At least this many digit characters
    MinDigits(usize),
    /// Digit count must be one of these values
    DigitCountIn(Vec<usize>),
    /// At least this many characters
    MinLength(usize),
}

impl ValidationRule {
    /// Evaluate the rule against matched text
    pub fn accepts(&self, matched: &str) -> bool {
        match self {
            Self::MinDigits(min) => digit_count(matched) >= *min,
            Self::DigitCountIn(allowed) => allowed.contains(&digit_count(matched)),
            Self::MinLength(min) => matched.chars().count() >= *min,
        }
    }

    fn check(&self, kind: EntityKind) -> Result<()> {
        let malformed = match self {
            Self::MinDigits(0) | Self::MinLength(0) => true,
            Self::DigitCountIn(allowed) => allowed.is_empty(),
            _ => false,
        };
        if malformed {
            return Err(RedactorError::Configuration(format!(
                "Malformed validation rule for {kind}: {self:?}"
            )));
        }
        Ok(())
    }
}

fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_numeric()).count()
}

/// Immutable per-kind rule table
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    rules: HashMap<EntityKind, ValidationRule>,
}

impl ValidationRules {
    /// Table with no rules; every match passes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in rules for card, phone and driver license numbers
    pub fn standard() -> Self {
        let mut rules = HashMap::new();
        rules.insert(EntityKind::CreditCard, ValidationRule::MinDigits(13));
        rules.insert(EntityKind::PhoneNumber, ValidationRule::DigitCountIn(vec![10, 11]));
        rules.insert(EntityKind::UsDriverLicense, ValidationRule::MinLength(4));
        Self { rules }
    }

    /// Standard rules with configured overrides applied on top
    pub fn with_overrides(overrides: &BTreeMap<String, ValidationRule>) -> Result<Self> {
        let mut table = Self::standard();
        for (name, rule) in overrides {
            let kind: EntityKind = name.parse()?;
            rule.check(kind)?;
            table.rules.insert(kind, rule.clone());
        }
        Ok(table)
    }

    /// Rule registered for `kind`, if any
    pub fn rule_for(&self, kind: EntityKind) -> Option<&ValidationRule> {
        self.rules.get(&kind)
    }

    /// Accept or reject a match; kinds without a rule always pass
    pub fn validate(&self, kind: EntityKind, matched: &str) -> bool {
        self.rules
            .get(&kind)
            .map_or(true, |rule| rule.accepts(matched))
    }
}
