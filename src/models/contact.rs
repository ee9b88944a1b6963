//! Contact model representing an entry in the contact book.

use crate::domain::ContactId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Shared, immutable snapshot of a loaded contact set.
///
/// The set is replaced wholesale on every load; filtering always produces
/// a new sequence and never mutates the snapshot.
pub type ContactSet = std::sync::Arc<Vec<Contact>>;

/// Rails renders blank columns as `null`; the contact book treats them as empty text.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A contact as loaded from the contact service.
///
/// `id` stays `None` until the server assigns one. The GraphQL query returns
/// `postalCode`, the Rails JSON endpoints return `postal_code`; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Contact {
    /// Server-assigned identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactId>,

    /// Full name
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,

    /// Street address
    #[serde(default, deserialize_with = "deserialize_text")]
    pub address: String,

    /// Postal code
    #[serde(
        default,
        rename = "postalCode",
        alias = "postal_code",
        deserialize_with = "deserialize_text"
    )]
    pub postal_code: String,

    /// City
    #[serde(default, deserialize_with = "deserialize_text")]
    pub city: String,
}

impl Contact {
    /// Create a stored contact with a server-assigned id.
    pub fn new(id: ContactId, fields: NewContact) -> Self {
        Self {
            id: Some(id),
            name: fields.name,
            address: fields.address,
            postal_code: fields.postal_code,
            city: fields.city,
        }
    }

    /// The four editable text fields of this contact.
    pub fn fields(&self) -> NewContact {
        NewContact {
            name: self.name.clone(),
            address: self.address.clone(),
            postal_code: self.postal_code.clone(),
            city: self.city.clone(),
        }
    }

    /// One-line rendering used in duplicate previews: `name, address, postalCode, city`.
    pub fn summary_line(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.name, self.address, self.postal_code, self.city
        )
    }
}

/// A contact that has not been stored yet.
///
/// This is the only shape accepted by the duplicate check and the create call.
/// None of the fields is validated locally; validation belongs to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewContact {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
}

impl NewContact {
    /// Create a new candidate contact.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            postal_code: postal_code.into(),
            city: city.into(),
        }
    }

    /// Query parameters understood by the near-duplicate endpoint.
    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("contact[name]", self.name.as_str()),
            ("contact[address]", self.address.as_str()),
            ("contact[postal_code]", self.postal_code.as_str()),
            ("contact[city]", self.city.as_str()),
        ]
    }
}

/// Request body for `POST /contacts`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateContactRequest<'a> {
    pub contact: &'a NewContact,

    /// Sent as `null` when no token is configured
    pub authenticity_token: Option<&'a str>,
}

impl<'a> CreateContactRequest<'a> {
    pub fn new(contact: &'a NewContact, authenticity_token: Option<&'a str>) -> Self {
        Self {
            contact,
            authenticity_token,
        }
    }
}

/// A searchable contact field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactField {
    Id,
    Name,
    Address,
    PostalCode,
    City,
}

impl ContactField {
    /// Every field in declaration order.
    pub const ALL: [ContactField; 5] = [
        ContactField::Id,
        ContactField::Name,
        ContactField::Address,
        ContactField::PostalCode,
        ContactField::City,
    ];

    /// Key of the field as it appears in a loaded contact record.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Address => "address",
            Self::PostalCode => "postalCode",
            Self::City => "city",
        }
    }

    /// Value of this field on a contact, `None` when the field is absent.
    pub fn value<'c>(&self, contact: &'c Contact) -> Option<&'c str> {
        match self {
            Self::Id => contact.id.as_ref().map(ContactId::as_str),
            Self::Name => Some(&contact.name),
            Self::Address => Some(&contact.address),
            Self::PostalCode => Some(&contact.postal_code),
            Self::City => Some(&contact.city),
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
