use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Longest key accepted, in bytes. Keys become single filename components.
pub const MAX_KEY_LEN: usize = 255;

/// Validated name of an object.
///
/// A key maps to exactly one file directly under the storage root, so it may
/// not contain path separators, NUL or control characters, and may not start
/// with `.`. The last rule rules out `.` and `..` and leaves hidden names free
/// for in-flight writes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Validate and wrap a key.
    pub fn parse(key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        if let Some(reason) = Self::violation(&key) {
            return Err(StoreError::InvalidKey { key, reason });
        }
        Ok(Self(key))
    }

    fn violation(key: &str) -> Option<&'static str> {
        if key.is_empty() {
            return Some("key is empty");
        }
        if key.len() > MAX_KEY_LEN {
            return Some("key is longer than 255 bytes");
        }
        if key.starts_with('.') {
            return Some("key may not start with '.'");
        }
        if key.contains(&['/', '\\'][..]) {
            return Some("key may not contain path separators");
        }
        if key.chars().any(char::is_control) {
            return Some("key may not contain control characters");
        }
        None
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({:?})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ObjectKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectKey {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = StoreError;

    fn try_from(value: String) -> StoreResult<Self> {
        Self::parse(value)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reason_for(key: &str) -> &'static str {
        match ObjectKey::parse(key) {
            Err(StoreError::InvalidKey { reason, .. }) => reason,
            other => panic!("expected InvalidKey for {key:?}, got {other:?}"),
        }
    }

    #[test]
    fn accepts_plain_names() {
        for key in ["report.txt", "a", "photo 2024.jpg", "ключ", "x..y", "file."] {
            let parsed = ObjectKey::parse(key).unwrap();
            assert_eq!(parsed.as_str(), key);
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(reason_for(""), "key is empty");
    }

    #[test]
    fn rejects_traversal() {
        assert_eq!(reason_for(".."), "key may not start with '.'");
        assert_eq!(reason_for("."), "key may not start with '.'");
        assert_eq!(reason_for("../etc/passwd"), "key may not start with '.'");
        assert_eq!(reason_for("a/../b"), "key may not contain path separators");
        assert_eq!(reason_for("a\\b"), "key may not contain path separators");
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(reason_for("a\0b"), "key may not contain control characters");
        assert_eq!(reason_for("line\nbreak"), "key may not contain control characters");
    }

    #[test]
    fn rejects_overlong() {
        let key = "k".repeat(MAX_KEY_LEN + 1);
        assert_eq!(reason_for(&key), "key is longer than 255 bytes");
        assert!(ObjectKey::parse("k".repeat(MAX_KEY_LEN)).is_ok());
    }

    #[test]
    fn display_and_from_str() {
        let key: ObjectKey = "report.txt".parse().unwrap();
        assert_eq!(format!("{key}"), "report.txt");
        assert_eq!(format!("{key:?}"), "ObjectKey(\"report.txt\")");
        assert_eq!(String::from(key), "report.txt");
    }

    #[test]
    fn serde_revalidates() {
        let key = ObjectKey::parse("a.bin").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"a.bin\"");
        let back: ObjectKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<ObjectKey>("\"../x\"").is_err());
    }

    proptest! {
        #[test]
        fn safe_names_always_parse(key in "[A-Za-z0-9_-][A-Za-z0-9._ -]{0,120}") {
            prop_assert!(ObjectKey::parse(key).is_ok());
        }

        #[test]
        fn names_with_separators_never_parse(
            head in "[a-z]{0,8}",
            sep in "[/\\\\]",
            tail in "[a-z]{0,8}"
        ) {
            let key = format!("{head}{sep}{tail}");
            prop_assert!(ObjectKey::parse(key).is_err());
        }
    }
}
