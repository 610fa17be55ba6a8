//! In-memory `NoteRepository`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{NoteRepository, NoteRepositoryError};
use crate::domain::{Note, NoteDraft, NoteId, UserId};

use super::lock;

/// Notes keyed by id; ownership is checked on every access.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    notes: Mutex<HashMap<NoteId, Note>>,
}

impl InMemoryNoteRepository {
    fn owned<'a>(
        notes: &'a mut HashMap<NoteId, Note>,
        owner: &UserId,
        id: &NoteId,
    ) -> Option<&'a mut Note> {
        notes.get_mut(id).filter(|note| note.owner == *owner)
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut owned: Vec<Note> = lock(&self.notes)
            .values()
            .filter(|note| note.owner == *owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn find(&self, owner: &UserId, id: &NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        Ok(lock(&self.notes)
            .get(id)
            .filter(|note| note.owner == *owner)
            .cloned())
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let note = Note::from_draft(NoteId::random(), owner.clone(), draft.clone(), now);
        lock(&self.notes).insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_content(
        &self,
        owner: &UserId,
        id: &NoteId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let mut notes = lock(&self.notes);
        let note = Self::owned(&mut notes, owner, id)
            .ok_or_else(|| NoteRepositoryError::not_found(*id))?;
        note.title = draft.title.clone();
        note.content = draft.content.clone();
        note.updated_at = now;
        Ok(note.clone())
    }

    async fn set_summary_if_absent(
        &self,
        owner: &UserId,
        id: &NoteId,
        summary: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let mut notes = lock(&self.notes);
        let note = Self::owned(&mut notes, owner, id)
            .ok_or_else(|| NoteRepositoryError::not_found(*id))?;
        if note.summary.is_some() {
            return Err(NoteRepositoryError::summary_exists(*id));
        }
        note.summary = Some(summary.to_owned());
        note.updated_at = now;
        Ok(note.clone())
    }

    async fn delete(&self, owner: &UserId, id: &NoteId) -> Result<(), NoteRepositoryError> {
        let mut notes = lock(&self.notes);
        if Self::owned(&mut notes, owner, id).is_some() {
            notes.remove(id);
        }
        Ok(())
    }
}
