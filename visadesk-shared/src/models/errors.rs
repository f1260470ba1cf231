use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error body returned by the identity service.
///
/// Validation failures additionally carry a per-field list of messages.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The main error message
    pub message: String,
    /// Field-level validation messages, keyed by field name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorResponse {
    /// First field-level message, in field-name order.
    pub fn first_field_error(&self) -> Option<&str> {
        self.errors
            .values()
            .flatten()
            .next()
            .map(String::as_str)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "{}", self.message);
        }
        let fields = self.errors.keys().cloned().collect::<Vec<_>>().join(", ");
        write!(f, "{} ({fields})", self.message)
    }
}
