//! ContactId value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A server-assigned, opaque contact identity.
///
/// The GraphQL endpoint renders ids as strings while the Rails JSON
/// endpoints render the integer primary key, so both forms deserialize
/// into the same value.
///
/// # Example
///
/// ```
/// use contact_book::domain::ContactId;
///
/// let id = ContactId::new("42").unwrap();
/// assert_eq!(id.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(String);

impl ContactId {
    /// Create a new ContactId, validating that it's not empty.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyId` if the provided ID is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<u64> for ContactId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for ContactId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Wire forms accepted for an id.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContactId {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawContactId::deserialize(deserializer)? {
            RawContactId::Text(s) => ContactId::new(s).map_err(serde::de::Error::custom),
            RawContactId::Number(n) => Ok(ContactId::from(n)),
        }
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_id_valid() {
        let id = ContactId::new("contact_123").unwrap();
        assert_eq!(id.as_str(), "contact_123");
    }

    #[test]
    fn test_contact_id_rejects_empty() {
        assert_eq!(ContactId::new(""), Err(ValidationError::EmptyId));
        assert_eq!(ContactId::new("  "), Err(ValidationError::EmptyId));
    }

    #[test]
    fn test_contact_id_serializes_as_string() {
        let id = ContactId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_contact_id_deserializes_string_and_number() {
        let from_text: ContactId = serde_json::from_str("\"12\"").unwrap();
        let from_number: ContactId = serde_json::from_str("12").unwrap();
        assert_eq!(from_text, from_number);
    }

    #[test]
    fn test_contact_id_deserialization_empty_fails() {
        let result: Result<ContactId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
