//! Test doubles shared by the integration tests.

mod mock_contact_repository;
mod recording_doubles;

#[allow(unused_imports)]
pub use mock_contact_repository::MockContactRepository;
#[allow(unused_imports)]
pub use recording_doubles::{RecordingConfirmation, RecordingRefresher};
