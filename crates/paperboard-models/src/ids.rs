//! Identifier newtypes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a news document.
///
/// Assigned by the remote store when the document is created; the client
/// never mints one of these itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsId(String);

impl NewsId {
    /// Creates an id from an existing string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NewsId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NewsId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_id_roundtrip() {
        let id = NewsId::from_string("abc123");
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_news_id_serde_transparent() {
        let id = NewsId::from_string("doc-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"doc-1\"");

        let back: NewsId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
