//! Predicted labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// A class label as stored in the artifact and returned to callers.
///
/// Serializes as a bare JSON scalar, so `"rice"` and `7` both round-trip
/// without a wrapper object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer-coded class
    Integer(i64),
    /// Named class
    Text(String),
}

impl Label {
    /// Create a named label
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Borrow the label as a string, if it is named
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serializes_as_scalar() {
        assert_eq!(serde_json::to_string(&Label::text("rice")).unwrap(), "\"rice\"");
        assert_eq!(serde_json::to_string(&Label::Integer(3)).unwrap(), "3");
    }

    #[test]
    fn test_label_deserializes_mixed() {
        let labels: Vec<Label> = serde_json::from_str(r#"["maize", 4]"#).unwrap();
        assert_eq!(labels, vec![Label::text("maize"), Label::Integer(4)]);
        assert_eq!(labels[0].as_str(), Some("maize"));
        assert_eq!(labels[1].as_str(), None);
        assert_eq!(labels[1].to_string(), "4");
    }

    #[test]
    fn test_float_label_rejected() {
        assert!(serde_json::from_str::<Label>("1.5").is_err());
    }
}
