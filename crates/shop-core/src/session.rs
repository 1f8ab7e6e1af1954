//! Payment Session Reference
//!
//! Opaque checkout session token handed back by the payment provider in
//! the success redirect (`/payment/success?session_id=...`).

use serde::{Deserialize, Serialize};

/// Query parameter carrying the session reference
pub const SESSION_QUERY_PARAM: &str = "session_id";

/// Opaque payment session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionRef(String);

impl SessionRef {
    /// Capture a session reference.
    ///
    /// Returns `None` for blank input; a blank reference is treated the same
    /// as a missing one.
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Capture from an optional query parameter value
    pub fn from_query(value: Option<impl Into<String>>) -> Option<Self> {
        value.and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
