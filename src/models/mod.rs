pub mod event;
pub mod media;
pub mod plan;
pub mod profile;
pub mod rsvp;

use serde::Serialize;

/// A local validation failure, reported inline next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Character count (not bytes), so Devanagari and Telugu names are measured fairly.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
