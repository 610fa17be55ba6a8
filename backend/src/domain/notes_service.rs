//! Note domain service implementing the notes driving ports.
//!
//! Reads go through the per-owner [`QueryCache`]; every mutation is tracked
//! in the [`MutationTracker`] and invalidates the owner's cached list on
//! success.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ListNotesRequest, MutationOutcome, NoteRepository, NoteRepositoryError, NotesCommand,
    NotesQuery, SummarizeCommand,
};
use crate::domain::query_cache::{EntityKind, QueryCache};
use crate::domain::search::filter_notes;
use crate::domain::{
    Error, MutationKind, MutationState, MutationTracker, Note, NoteDraft, NoteId, UserId,
};

/// Map repository failures onto the domain error taxonomy.
pub(crate) fn map_note_repository_error(error: NoteRepositoryError) -> Error {
    match error {
        NoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("note repository unavailable: {message}"))
        }
        NoteRepositoryError::Query { message } => {
            Error::internal(format!("note repository error: {message}"))
        }
        NoteRepositoryError::NotFound { .. } => Error::not_found("Note not found"),
        NoteRepositoryError::SummaryExists { .. } => Error::conflict("note already has a summary"),
    }
}

/// Notes service implementing [`NotesQuery`] and [`NotesCommand`].
pub struct NotesService<R: ?Sized> {
    repo: Arc<R>,
    summarizer: Arc<dyn SummarizeCommand>,
    cache: QueryCache<Vec<Note>>,
    tracker: MutationTracker,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> NotesService<R> {
    /// Create a service whose cached lists stay fresh for `freshness`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use std::time::Duration;
    /// # use mockable::DefaultClock;
    /// # use notes_backend::domain::{NotesService, SummarizationService};
    /// # use notes_backend::outbound::memory::InMemoryNoteRepository;
    /// let service = NotesService::new(
    ///     Arc::new(InMemoryNoteRepository::default()),
    ///     Arc::new(SummarizationService::unconfigured()),
    ///     Duration::from_secs(300),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        repo: Arc<R>,
        summarizer: Arc<dyn SummarizeCommand>,
        freshness: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            summarizer,
            cache: QueryCache::new(freshness, clock.clone()),
            tracker: MutationTracker::new(),
            clock,
        }
    }
}

impl<R> NotesService<R>
where
    R: NoteRepository + ?Sized,
{
    async fn tracked<T, Fut>(
        &self,
        owner: &UserId,
        kind: MutationKind,
        operation: Fut,
        notice: impl FnOnce(&T) -> String,
    ) -> Result<MutationOutcome<T>, Error>
    where
        Fut: Future<Output = Result<T, Error>>,
    {
        let ticket = self.tracker.begin(owner, kind)?;
        match operation.await {
            Ok(value) => {
                self.cache.invalidate(EntityKind::Notes, owner);
                let notice = notice(&value);
                info!(user_id = %owner, kind = ?kind, "note mutation succeeded");
                ticket.succeed(notice.clone());
                Ok(MutationOutcome::new(value, notice))
            }
            Err(error) => {
                warn!(user_id = %owner, kind = ?kind, error = %error, "note mutation failed");
                ticket.fail(&error);
                Err(error)
            }
        }
    }

    async fn owned_notes(&self, owner: &UserId) -> Result<Vec<Note>, Error> {
        if let Some(notes) = self.cache.get(EntityKind::Notes, owner) {
            debug!(user_id = %owner, "serving notes from cache");
            return Ok(notes);
        }
        let generation = self.cache.generation(EntityKind::Notes, owner);
        let notes = self
            .repo
            .list_for_owner(owner)
            .await
            .map_err(map_note_repository_error)?;
        if !self.cache.put(EntityKind::Notes, owner, notes.clone(), generation) {
            debug!(user_id = %owner, "notes changed during fetch; not caching");
        }
        Ok(notes)
    }

    async fn summarize_note(&self, owner: &UserId, id: &NoteId) -> Result<Note, Error> {
        let note = self
            .repo
            .find(owner, id)
            .await
            .map_err(map_note_repository_error)?
            .ok_or_else(|| Error::not_found("Note not found"))?;
        if note.summary.is_some() {
            return Err(Error::conflict("note already has a summary"));
        }

        let summary = self
            .summarizer
            .summarize(Some(note.content.as_ref().to_owned()))
            .await?;

        self.repo
            .set_summary_if_absent(owner, id, &summary, self.clock.utc())
            .await
            .map_err(map_note_repository_error)
    }
}

#[async_trait]
impl<R> NotesQuery for NotesService<R>
where
    R: NoteRepository + ?Sized,
{
    async fn list_notes(&self, request: ListNotesRequest) -> Result<Vec<Note>, Error> {
        let notes = self.owned_notes(&request.owner).await?;
        Ok(filter_notes(notes, request.search.as_deref()))
    }

    async fn get_note(&self, owner: &UserId, id: &NoteId) -> Result<Note, Error> {
        self.repo
            .find(owner, id)
            .await
            .map_err(map_note_repository_error)?
            .ok_or_else(|| Error::not_found("Note not found"))
    }

    fn mutation_activity(&self, owner: &UserId) -> Vec<(MutationKind, MutationState)> {
        self.tracker.snapshot(owner)
    }
}

#[async_trait]
impl<R> NotesCommand for NotesService<R>
where
    R: NoteRepository + ?Sized,
{
    async fn create_note(
        &self,
        owner: &UserId,
        draft: NoteDraft,
    ) -> Result<MutationOutcome<Note>, Error> {
        let now = self.clock.utc();
        let insert = async {
            self.repo
                .insert(owner, &draft, now)
                .await
                .map_err(map_note_repository_error)
        };
        self.tracked(owner, MutationKind::Create, insert, |_| {
            "Note created successfully".to_owned()
        })
        .await
    }

    async fn update_note(
        &self,
        owner: &UserId,
        id: &NoteId,
        draft: NoteDraft,
    ) -> Result<MutationOutcome<Note>, Error> {
        let now = self.clock.utc();
        let update = async {
            self.repo
                .update_content(owner, id, &draft, now)
                .await
                .map_err(map_note_repository_error)
        };
        self.tracked(owner, MutationKind::Update, update, |_| {
            "Note updated successfully".to_owned()
        })
        .await
    }

    async fn delete_note(&self, owner: &UserId, id: &NoteId) -> Result<MutationOutcome<()>, Error> {
        let delete = async {
            self.repo
                .delete(owner, id)
                .await
                .map_err(map_note_repository_error)
        };
        self.tracked(owner, MutationKind::Delete, delete, |_| {
            "Note deleted successfully".to_owned()
        })
        .await
    }

    async fn delete_all_notes(&self, owner: &UserId) -> Result<MutationOutcome<usize>, Error> {
        let delete_all = async {
            self.repo
                .delete_all_for_owner(owner)
                .await
                .map_err(map_note_repository_error)
        };
        self.tracked(owner, MutationKind::DeleteAll, delete_all, |count| {
            format!("Successfully deleted {count} note(s)")
        })
        .await
    }

    async fn generate_summary(
        &self,
        owner: &UserId,
        id: &NoteId,
    ) -> Result<MutationOutcome<Note>, Error> {
        self.tracked(
            owner,
            MutationKind::Summarize,
            self.summarize_note(owner, id),
            |_| "Summary generated successfully".to_owned(),
        )
        .await
    }
}

#[cfg(test)]
#[path = "notes_service_tests.rs"]
mod tests;
