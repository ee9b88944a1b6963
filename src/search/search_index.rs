//! Disposable in-memory text index over a loaded contact set.
//!
//! An index is built from one contact set, queried, and thrown away. It is never
//! patched incrementally: a changed contact set means a fresh index.

use super::tokenizer::{tokenize, within_distance};
use crate::error::{IndexError, IndexResult};
use crate::models::{Contact, ContactField};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

/// How the terms of a multi-term query are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineWith {
    /// Every query term must hit the contact.
    And,
    /// Any query term hitting the contact is enough.
    #[default]
    Or,
}

impl FromStr for CombineWith {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(format!("Must be 'and' or 'or', got: {}", other)),
        }
    }
}

impl fmt::Display for CombineWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
        }
    }
}

/// Matching policy of the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Query terms also match indexed terms they are a prefix of.
    pub prefix: bool,

    /// Allowed edit distance as a ratio of the query term length.
    pub fuzzy: f64,

    /// Upper bound on the allowed edit distance.
    pub max_fuzzy: usize,

    pub combine_with: CombineWith,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            prefix: true,
            fuzzy: 0.2,
            max_fuzzy: 6,
            combine_with: CombineWith::Or,
        }
    }
}

impl SearchOptions {
    /// Edit distance budget for a query term: `round(len * fuzzy)`, capped at `max_fuzzy`.
    pub fn max_distance(&self, term: &str) -> usize {
        let length = term.chars().count() as f64;
        ((length * self.fuzzy).round() as usize).min(self.max_fuzzy)
    }
}

/// The ordered set of contact fields an index treats as searchable text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<ContactField>,
}

impl FieldSchema {
    /// Explicit schema.
    pub fn new(fields: Vec<ContactField>) -> Self {
        Self { fields }
    }

    /// Derive the schema from the fields present on the first contact.
    ///
    /// An empty set yields an empty schema, and an index with an empty
    /// schema matches nothing. This is the expected state before the first load.
    pub fn derive(contacts: &[Contact]) -> Self {
        match contacts.first() {
            Some(first) => Self {
                fields: ContactField::ALL
                    .into_iter()
                    .filter(|field| field.value(first).is_some())
                    .collect(),
            },
            None => Self::default(),
        }
    }

    pub fn fields(&self) -> &[ContactField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: ContactField) -> bool {
        self.fields.contains(&field)
    }
}

/// Where an indexed term occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Posting {
    document: usize,
    field: ContactField,
}

/// One indexed contact.
#[derive(Debug, Clone)]
pub struct SearchIndexEntry<'a> {
    /// Position of the contact in the source set
    pub position: usize,

    pub contact: &'a Contact,
}

/// Inverted index over a contact set.
#[derive(Debug)]
pub struct SearchIndex<'a> {
    schema: FieldSchema,
    options: SearchOptions,
    entries: Vec<SearchIndexEntry<'a>>,
    terms: BTreeMap<String, Vec<Posting>>,
}

impl<'a> SearchIndex<'a> {
    /// Create an empty index for the given schema.
    pub fn new(schema: FieldSchema, options: SearchOptions) -> Self {
        Self {
            schema,
            options,
            entries: Vec::new(),
            terms: BTreeMap::new(),
        }
    }

    /// Derive the schema from `contacts` and index all of them.
    ///
    /// Never fails: an empty set gives an empty, queryable index.
    pub fn build(contacts: &'a [Contact], options: SearchOptions) -> Self {
        let mut index = Self::new(FieldSchema::derive(contacts), options);
        index.index_documents(contacts);

        tracing::debug!(
            documents = index.document_count(),
            terms = index.term_count(),
            fields = index.schema.fields().len(),
            "Search index built"
        );

        index
    }

    /// Index every contact of the set.
    ///
    /// An index is filled exactly once; adding to a populated index fails.
    pub fn add_all(&mut self, contacts: &'a [Contact]) -> IndexResult<()> {
        if !self.entries.is_empty() {
            return Err(IndexError::AlreadyPopulated(self.entries.len()));
        }

        self.index_documents(contacts);
        Ok(())
    }

    fn index_documents(&mut self, contacts: &'a [Contact]) {
        for (position, contact) in contacts.iter().enumerate() {
            for field in self.schema.fields() {
                let Some(value) = field.value(contact) else {
                    continue;
                };

                for term in tokenize(value) {
                    self.terms.entry(term).or_default().push(Posting {
                        document: position,
                        field: *field,
                    });
                }
            }

            self.entries.push(SearchIndexEntry { position, contact });
        }
    }

    /// Contacts matching `query`, in the order of the source set.
    pub fn search(&self, query: &str) -> Vec<&'a Contact> {
        let matched = self.matching_documents(query);

        self.entries
            .iter()
            .filter(|entry| matched.contains(&entry.position))
            .map(|entry| entry.contact)
            .collect()
    }

    /// Positions of the documents matching `query`.
    pub fn matching_documents(&self, query: &str) -> BTreeSet<usize> {
        let query_terms = tokenize(query);
        let mut matched: Option<BTreeSet<usize>> = None;

        for term in &query_terms {
            let hits = self.term_hits(term);

            matched = Some(match (matched, self.options.combine_with) {
                (None, _) => hits,
                (Some(acc), CombineWith::And) => acc.intersection(&hits).copied().collect(),
                (Some(mut acc), CombineWith::Or) => {
                    acc.extend(hits);
                    acc
                }
            });
        }

        matched.unwrap_or_default()
    }

    fn term_hits(&self, term: &str) -> BTreeSet<usize> {
        self.term_postings(term)
            .map(|posting| posting.document)
            .collect()
    }

    /// Postings of every indexed term that `term` hits exactly, as a prefix, or fuzzily.
    ///
    /// Exact and prefix hits are one contiguous run of the ordered term map.
    /// Fuzzy candidates need a scan of every term, so the scan only runs when
    /// the term's edit budget is non-zero.
    fn term_postings<'s>(&'s self, term: &'s str) -> impl Iterator<Item = &'s Posting> + 's {
        let max_distance = self.options.max_distance(term);
        let prefix = self.options.prefix;

        let direct = self
            .terms
            .range::<str, _>((Bound::Included(term), Bound::Unbounded))
            .take_while(move |(indexed, _)| direct_hit(indexed, term, prefix));

        let fuzzy = (max_distance > 0)
            .then(|| {
                self.terms.iter().filter(move |(indexed, _)| {
                    !direct_hit(indexed, term, prefix)
                        && within_distance(term, indexed, max_distance)
                })
            })
            .into_iter()
            .flatten();

        direct
            .chain(fuzzy)
            .flat_map(|(_, postings)| postings.iter())
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn entries(&self) -> &[SearchIndexEntry<'a>] {
        &self.entries
    }

    /// Get the number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.entries.len()
    }

    /// Get the number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}

fn direct_hit(indexed: &str, term: &str, prefix: bool) -> bool {
    if prefix {
        indexed.starts_with(term)
    } else {
        indexed == term
    }
}

/// Build a throwaway index over `contacts` and return the matching contacts.
///
/// The result is a new sequence in source order; `contacts` is left untouched.
pub fn filter_contacts(contacts: &[Contact], query: &str, options: SearchOptions) -> Vec<Contact> {
    SearchIndex::build(contacts, options)
        .search(query)
        .into_iter()
        .cloned()
        .collect()
}
