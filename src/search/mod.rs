//! In-memory text search over a loaded contact set.
//!
//! The index supports word-prefix and edit-distance (fuzzy) matching, and
//! always reports matches in the order of the source contact set.

pub mod search_index;
pub mod tokenizer;

pub use search_index::{
    filter_contacts, CombineWith, FieldSchema, SearchIndex, SearchIndexEntry, SearchOptions,
};
