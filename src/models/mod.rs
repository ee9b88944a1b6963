//! Data models for the contact book.
//!
//! Stored contacts, candidate contacts awaiting creation, and the request
//! payloads exchanged with the contact service.

pub mod contact;

pub use contact::{Contact, ContactField, ContactSet, CreateContactRequest, NewContact};
