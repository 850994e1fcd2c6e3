//! Credential handling for the recognizer API key
//!
//! The key is wrapped in `secrecy::Secret`, zeroed on drop, redacted in
//! `Debug` output, and only readable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use pii_redactor::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let api_key = secret_string("ner-token".to_string());
//! assert_eq!(api_key.expose_secret(), "ner-token");
//! assert!(!format!("{api_key:?}").contains("ner-token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl From<SecretValue> for String {
    fn from(mut s: SecretValue) -> Self {
        std::mem::take(&mut s.0)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
///
/// This wraps a `SecretValue` in a `Secret` container that:
/// - Zeros the memory when dropped
/// - Prevents accidental logging via Debug
/// - Requires explicit `expose_secret()` to access
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a secret
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("ner-token".to_string());
        assert_eq!(secret.expose_secret(), "ner-token");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("bearer-value".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("bearer-value"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_secret_serde() {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize)]
        struct TestConfig {
            api_key: SecretString,
        }

        let parsed: TestConfig = toml::from_str("api_key = \"abc123\"").unwrap();
        assert_eq!(parsed.api_key.expose_secret(), "abc123");

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.contains("abc123"));
    }
}
