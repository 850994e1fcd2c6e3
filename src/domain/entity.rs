//! Entity data models
//!
//! Closed taxonomy of sensitive entity kinds, the source that produced a
//! candidate, and the candidate span itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::RedactorError;

/// Sensitive entity kinds recognized by the engine
///
/// The set is closed: new kinds are added as enum members, never as
/// free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Person names
    Person,
    /// Email addresses
    EmailAddress,
    /// Telephone numbers
    PhoneNumber,
    /// Payment card numbers
    CreditCard,
    /// Street addresses and PO boxes
    Address,
    /// US Social Security Numbers
    UsSsn,
    /// US passport numbers
    UsPassport,
    /// US driver license numbers
    UsDriverLicense,
    /// US bank routing numbers
    UsBankNumber,
    /// Bank account numbers
    AccountNumber,
    /// Geopolitical entities and locations
    Location,
    /// Companies, agencies, institutions
    Organization,
    /// Dates and times
    DateTime,
    /// Monetary amounts
    Money,
    /// Cardinal numbers
    Number,
    /// Health insurance card numbers
    HealthInsuranceId,
    /// ZIP and ZIP+4 codes
    ZipCode,
}

impl EntityKind {
    /// Every kind, in declaration order
    pub const ALL: [EntityKind; 17] = [
        Self::Person,
        Self::EmailAddress,
        Self::PhoneNumber,
        Self::CreditCard,
        Self::Address,
        Self::UsSsn,
        Self::UsPassport,
        Self::UsDriverLicense,
        Self::UsBankNumber,
        Self::AccountNumber,
        Self::Location,
        Self::Organization,
        Self::DateTime,
        Self::Money,
        Self::Number,
        Self::HealthInsuranceId,
        Self::ZipCode,
    ];

    /// Canonical name, also used inside redaction placeholders
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::EmailAddress => "EMAIL_ADDRESS",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::CreditCard => "CREDIT_CARD",
            Self::Address => "ADDRESS",
            Self::UsSsn => "US_SSN",
            Self::UsPassport => "US_PASSPORT",
            Self::UsDriverLicense => "US_DRIVER_LICENSE",
            Self::UsBankNumber => "US_BANK_NUMBER",
            Self::AccountNumber => "ACCOUNT_NUMBER",
            Self::Location => "LOCATION",
            Self::Organization => "ORGANIZATION",
            Self::DateTime => "DATE_TIME",
            Self::Money => "MONEY",
            Self::Number => "NUMBER",
            Self::HealthInsuranceId => "HEALTH_INSURANCE_ID",
            Self::ZipCode => "ZIP_CODE",
        }
    }

    /// Placeholder written in place of a redacted span
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| RedactorError::Configuration(format!("Unknown entity kind: {s}")))
    }
}

/// Subsystem that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Pattern table match
    Pattern,
    /// External neural entity recognizer
    NeuralNer,
}

impl SourceKind {
    /// Rank used in the resolver's total order (patterns first)
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Pattern => 0,
            Self::NeuralNer => 1,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern => f.write_str("pattern"),
            Self::NeuralNer => f.write_str("neural_ner"),
        }
    }
}

/// Tentative occurrence of an entity kind at a byte range of the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Entity kind
    pub kind: EntityKind,
    /// Exact substring `original[start..end]`
    pub text: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Producing subsystem
    pub source: SourceKind,
}

impl CandidateSpan {
    /// Build a span by slicing `original`
    ///
    /// Returns `None` when the range is empty, out of bounds or does not fall
    /// on `char` boundaries.
    pub fn from_text(
        original: &str,
        start: usize,
        end: usize,
        kind: EntityKind,
        confidence: f32,
        source: SourceKind,
    ) -> Option<Self> {
        if start >= end {
            return None;
        }
        let text = original.get(start..end)?;
        Some(Self {
            start,
            end,
            kind,
            text: text.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            source,
        })
    }

    /// Half-open interval intersection test
    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Span length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false for a well-formed span
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check the span still describes `original` exactly
    pub fn is_faithful_to(&self, original: &str) -> bool {
        self.start < self.end && original.get(self.start..self.end) == Some(self.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("us_ssn".parse::<EntityKind>().unwrap(), EntityKind::UsSsn);
        assert!("SOCIAL".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_kind_serde_name_matches_as_str() {
        let json = serde_json::to_string(&EntityKind::UsDriverLicense).unwrap();
        assert_eq!(json, "\"US_DRIVER_LICENSE\"");
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(EntityKind::EmailAddress.placeholder(), "<EMAIL_ADDRESS>");
    }

    #[test]
    fn test_from_text_rejects_bad_ranges() {
        let text = "héllo";
        assert!(CandidateSpan::from_text(text, 0, 0, EntityKind::Person, 0.9, SourceKind::Pattern).is_none());
        assert!(CandidateSpan::from_text(text, 0, 99, EntityKind::Person, 0.9, SourceKind::Pattern).is_none());
        // byte 2 is inside 'é'
        assert!(CandidateSpan::from_text(text, 0, 2, EntityKind::Person, 0.9, SourceKind::Pattern).is_none());

        let span = CandidateSpan::from_text(text, 0, 3, EntityKind::Person, 1.7, SourceKind::Pattern).unwrap();
        assert_eq!(span.text, "hé");
        assert_eq!(span.confidence, 1.0);
        assert!(span.is_faithful_to(text));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let text = "abcdefgh";
        let a = CandidateSpan::from_text(text, 0, 4, EntityKind::Number, 0.9, SourceKind::Pattern).unwrap();
        let b = CandidateSpan::from_text(text, 4, 8, EntityKind::Number, 0.9, SourceKind::Pattern).unwrap();
        let c = CandidateSpan::from_text(text, 3, 5, EntityKind::Number, 0.9, SourceKind::Pattern).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
