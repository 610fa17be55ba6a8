//! Driving port for note reads.
//!
//! Inbound adapters use this port to list, search and fetch notes without
//! importing persistence or cache concerns.

use async_trait::async_trait;

use crate::domain::{Error, MutationKind, MutationState, Note, NoteId, UserId};

/// Request to list an owner's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotesRequest {
    pub owner: UserId,
    /// Optional case-insensitive search term over title and content.
    pub search: Option<String>,
}

/// Domain use-case port for reading notes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotesQuery: Send + Sync {
    /// Notes owned by the caller, most recently updated first.
    async fn list_notes(&self, request: ListNotesRequest) -> Result<Vec<Note>, Error>;

    /// One owned note; `NotFound` when absent or owned by someone else.
    async fn get_note(&self, owner: &UserId, id: &NoteId) -> Result<Note, Error>;

    /// State of every mutation kind for the caller.
    fn mutation_activity(&self, owner: &UserId) -> Vec<(MutationKind, MutationState)>;
}
