//! Driving port for note mutations.

use async_trait::async_trait;

use crate::domain::{Error, Note, NoteDraft, NoteId, UserId};

/// Result of a successful mutation together with its user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome<T> {
    pub value: T,
    pub notice: String,
}

impl<T> MutationOutcome<T> {
    pub fn new(value: T, notice: impl Into<String>) -> Self {
        Self {
            value,
            notice: notice.into(),
        }
    }
}

/// Domain use-case port for changing notes.
///
/// Every call is tracked per owner and kind; a second call of the same kind
/// while one is pending fails with a conflict.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotesCommand: Send + Sync {
    async fn create_note(
        &self,
        owner: &UserId,
        draft: NoteDraft,
    ) -> Result<MutationOutcome<Note>, Error>;

    /// Replace title and content; last write wins.
    async fn update_note(
        &self,
        owner: &UserId,
        id: &NoteId,
        draft: NoteDraft,
    ) -> Result<MutationOutcome<Note>, Error>;

    /// Delete one note. Deleting an absent note succeeds.
    async fn delete_note(&self, owner: &UserId, id: &NoteId) -> Result<MutationOutcome<()>, Error>;

    /// Delete every note of the caller and report the count.
    async fn delete_all_notes(&self, owner: &UserId) -> Result<MutationOutcome<usize>, Error>;

    /// Summarize the stored content and attach the summary exactly once.
    async fn generate_summary(
        &self,
        owner: &UserId,
        id: &NoteId,
    ) -> Result<MutationOutcome<Note>, Error>;
}
