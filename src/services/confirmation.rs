//! User confirmation before creating a likely duplicate.

use crate::models::Contact;

/// Opening sentence of the duplicate confirmation prompt.
pub const DUPLICATE_WARNING: &str = "The contact you are creating might be a duplicate of:";

/// Closing question of the duplicate confirmation prompt.
pub const DUPLICATE_QUESTION: &str = "Do you still want to create it?";

/// Render the confirmation prompt for a set of duplicate candidates.
///
/// One `name, address, postalCode, city` line per candidate, between the
/// warning sentence and the yes/no question. Callers may show it verbatim.
pub fn confirmation_prompt(duplicates: &[Contact]) -> String {
    let preview = duplicates
        .iter()
        .map(Contact::summary_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n{}\n\n{}", DUPLICATE_WARNING, preview, DUPLICATE_QUESTION)
}

/// A yes/no decision point the creation flow waits on.
///
/// The call is synchronous: an implementation backed by a blocking dialog
/// holds the calling task until the user answers.
pub trait ConfirmationPort: Send + Sync {
    /// Show `message` and return whether the user agreed.
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmationPort for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// A confirmation answered ahead of time.
///
/// Used by non-blocking front ends: the caller decides up front whether
/// duplicates are acceptable and re-submits after reading the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetConfirmation {
    answer: bool,
}

impl PresetConfirmation {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }

    pub fn accept() -> Self {
        Self::new(true)
    }

    pub fn decline() -> Self {
        Self::new(false)
    }
}

impl ConfirmationPort for PresetConfirmation {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(answer = self.answer, "Preset confirmation for: {}", message);
        self.answer
    }
}
