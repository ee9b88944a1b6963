//! Domain value objects and types.
//!
//! Type-safe wrappers for domain concepts that are validated at construction
//! time, so invalid identities cannot be represented in the system.

pub mod contact_id;
pub mod errors;

pub use contact_id::ContactId;
pub use errors::ValidationError;
