// Task record and its bounded text fields

use crate::error::{Field, Oversized, Result};
use serde::Serialize;

/// Maximum description length, in characters
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Maximum due date length, in characters
pub const MAX_DUE_DATE_LEN: usize = 19;

/// Text whose length was checked against a field's bound at construction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct BoundedText(String);

impl BoundedText {
    /// Validate `value` against the bound for `field`
    ///
    /// Oversized input is rejected, never truncated.
    pub fn new(field: Field, value: impl Into<String>) -> std::result::Result<Self, Oversized> {
        let value = value.into();
        let len = value.chars().count();
        let max = field.max_len();
        if len > max {
            return Err(Oversized { field, len, max });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BoundedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BoundedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub description: BoundedText,
    /// Free-form; never parsed by the store or codec
    pub due_date: BoundedText,
    pub completed: bool,
}

impl Task {
    /// Build a pending task, validating both text fields
    pub fn new(description: impl Into<String>, due_date: impl Into<String>) -> Result<Self> {
        Ok(Self {
            description: BoundedText::new(Field::Description, description)?,
            due_date: BoundedText::new(Field::DueDate, due_date)?,
            completed: false,
        })
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Pending" }
    }
}
