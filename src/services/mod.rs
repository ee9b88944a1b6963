//! Application service layer.
//!
//! Services hold the contact book's behavior: the loaded contact set, query
//! filtering, the near-duplicate check and the creation flow built on it.
//! They sit between the MCP handlers and the repositories.

mod confirmation;
mod creation_flow;
mod directory;
mod duplicate_checker;
mod search_controller;

pub use confirmation::{
    confirmation_prompt, ConfirmationPort, PresetConfirmation, DUPLICATE_QUESTION,
    DUPLICATE_WARNING,
};
pub use creation_flow::{
    ContactCreationFlow, CreationError, CreationEvent, CreationOutcome, CreationState,
};
pub use directory::{
    ContactDirectory, ContactListState, ContactSetRefresher, ContactSnapshot, UNEXPECTED_ERROR,
};
pub use duplicate_checker::{DuplicateCandidateSet, DuplicateChecker};
pub use search_controller::{ContactBookState, QueryState, SearchController};
