use async_trait::async_trait;
use contact_book::services::{ConfirmationPort, ContactSetRefresher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Confirmation port that answers with a fixed value and records every prompt.
#[allow(dead_code)]
pub struct RecordingConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ConfirmationPort for RecordingConfirmation {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}

/// Refresh collaborator that only counts how often it was asked to refresh.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingRefresher {
    refreshes: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactSetRefresher for RecordingRefresher {
    async fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}
