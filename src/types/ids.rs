use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Strong typing for platform IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentMarker;

/// Type aliases for specific ID types
pub type UserId = Id<UserMarker>;
pub type NoteId = Id<NoteMarker>;
pub type CommentId = Id<CommentMarker>;

impl<T> Id<T> {
    /// Parses a bare ID (e.g. `5965ebab50c4b438acc7a2e4`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();

        if value.is_empty() {
            return Err(ValidationError::InvalidId("ID cannot be empty".to_string()));
        }

        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidId(format!(
                "ID must be alphanumeric: {}",
                value
            )));
        }

        Ok(Self::from_normalized(value.to_string()))
    }

    /// Create an ID from an already validated string (internal use)
    pub(crate) fn from_normalized(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_normalized(value))
    }
}
