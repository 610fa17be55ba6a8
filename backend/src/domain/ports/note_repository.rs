//! Driven port for note persistence.
//!
//! Every method is scoped to an owner: adapters must never return or touch a
//! note whose owner differs from the one supplied.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;

use crate::domain::{Note, NoteDraft, NoteId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by note repository adapters.
    pub enum NoteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "note repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "note repository query failed: {message}",
        /// No note with this id belongs to the owner.
        NotFound { id: NoteId } => "note {id} not found",
        /// The note already carries a summary.
        SummaryExists { id: NoteId } => "note {id} already has a summary",
    }
}

/// Port for note storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes of `owner`, most recently updated first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Note>, NoteRepositoryError>;

    /// A single note, or `None` when absent or owned by someone else.
    async fn find(&self, owner: &UserId, id: &NoteId) -> Result<Option<Note>, NoteRepositoryError>;

    /// Persist a new note; the adapter assigns the identifier.
    async fn insert(
        &self,
        owner: &UserId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError>;

    /// Replace title and content, refreshing `updated_at`. The summary is kept.
    async fn update_content(
        &self,
        owner: &UserId,
        id: &NoteId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError>;

    /// Set the summary only when none is stored yet.
    ///
    /// Fails with [`NoteRepositoryError::SummaryExists`] when another writer
    /// got there first.
    async fn set_summary_if_absent(
        &self,
        owner: &UserId,
        id: &NoteId,
        summary: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError>;

    /// Remove a note. Removing an absent note succeeds.
    async fn delete(&self, owner: &UserId, id: &NoteId) -> Result<(), NoteRepositoryError>;

    /// Remove every note of `owner` and report how many were removed.
    ///
    /// Deletions run concurrently; the first failure fails the call while
    /// notes already removed stay removed.
    async fn delete_all_for_owner(&self, owner: &UserId) -> Result<usize, NoteRepositoryError> {
        let notes = self.list_for_owner(owner).await?;
        try_join_all(notes.iter().map(|note| self.delete(owner, &note.id))).await?;
        Ok(notes.len())
    }
}
