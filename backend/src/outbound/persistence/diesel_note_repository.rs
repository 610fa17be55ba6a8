//! PostgreSQL-backed `NoteRepository` implementation using Diesel ORM.
//!
//! Every statement filters on `user_id` so one owner can never read or change
//! another owner's rows. Summaries are written with a conditional update on
//! `summary IS NULL`, which makes the first writer win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{NoteRepository, NoteRepositoryError};
use crate::domain::{Note, NoteContent, NoteDraft, NoteId, NoteTitle, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewNoteRow, NoteContentUpdate, NoteRow};
use super::pool::{DbPool, PoolError};
use super::schema::notes;

/// Diesel-backed implementation of the `NoteRepository` port.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NoteRepositoryError {
    map_basic_pool_error(error, NoteRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NoteRepositoryError {
    map_basic_diesel_error(
        error,
        NoteRepositoryError::query,
        NoteRepositoryError::connection,
    )
}

fn row_to_note(row: NoteRow) -> Result<Note, NoteRepositoryError> {
    let invalid = |err: crate::domain::NoteValidationError| {
        warn!(note_id = %row.id, error = %err, "stored note failed validation");
        NoteRepositoryError::query(format!("stored note {} is invalid: {err}", row.id))
    };
    let title = NoteTitle::new(row.title.clone()).map_err(invalid)?;
    let content = NoteContent::new(row.content.clone()).map_err(invalid)?;
    Ok(Note {
        id: NoteId::new(row.id),
        owner: UserId::from_uuid(row.user_id),
        title,
        content,
        summary: row.summary,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NoteRow> = notes::table
            .filter(notes::user_id.eq(owner.as_uuid()))
            .order(notes::updated_at.desc())
            .select(NoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_note).collect()
    }

    async fn find(&self, owner: &UserId, id: &NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<NoteRow> = notes::table
            .filter(notes::id.eq(id.as_uuid()))
            .filter(notes::user_id.eq(owner.as_uuid()))
            .select(NoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_note).transpose()
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewNoteRow {
            user_id: *owner.as_uuid(),
            title: draft.title.as_ref(),
            content: draft.content.as_ref(),
            created_at: now,
            updated_at: now,
        };

        let row: NoteRow = diesel::insert_into(notes::table)
            .values(&new_row)
            .returning(NoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_note(row)
    }

    async fn update_content(
        &self,
        owner: &UserId,
        id: &NoteId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = NoteContentUpdate {
            title: draft.title.as_ref(),
            content: draft.content.as_ref(),
            updated_at: now,
        };

        let row: Option<NoteRow> = diesel::update(
            notes::table
                .filter(notes::id.eq(id.as_uuid()))
                .filter(notes::user_id.eq(owner.as_uuid())),
        )
        .set(&changes)
        .returning(NoteRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map_or_else(|| Err(NoteRepositoryError::not_found(*id)), row_to_note)
    }

    async fn set_summary_if_absent(
        &self,
        owner: &UserId,
        id: &NoteId,
        summary: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<NoteRow> = diesel::update(
            notes::table
                .filter(notes::id.eq(id.as_uuid()))
                .filter(notes::user_id.eq(owner.as_uuid()))
                .filter(notes::summary.is_null()),
        )
        .set((notes::summary.eq(summary), notes::updated_at.eq(now)))
        .returning(NoteRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = row {
            return row_to_note(row);
        }

        let exists: bool = diesel::select(diesel::dsl::exists(
            notes::table
                .filter(notes::id.eq(id.as_uuid()))
                .filter(notes::user_id.eq(owner.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if exists {
            Err(NoteRepositoryError::summary_exists(*id))
        } else {
            Err(NoteRepositoryError::not_found(*id))
        }
    }

    async fn delete(&self, owner: &UserId, id: &NoteId) -> Result<(), NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            notes::table
                .filter(notes::id.eq(id.as_uuid()))
                .filter(notes::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }
}
