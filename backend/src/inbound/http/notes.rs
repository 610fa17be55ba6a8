//! Notes HTTP handlers.
//!
//! ```text
//! GET    /api/v1/notes?q=term
//! POST   /api/v1/notes {"title":"...","content":"..."}
//! DELETE /api/v1/notes
//! GET    /api/v1/notes/activity
//! GET    /api/v1/notes/{id}
//! PUT    /api/v1/notes/{id}
//! DELETE /api/v1/notes/{id}
//! POST   /api/v1/notes/{id}/summary
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ListNotesRequest;
use crate::domain::{MutationKind, MutationState, Note, NoteDraft, NoteId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MutationKindSchema, MutationStateSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_note_validation_error, parse_note_id};

const NOTE_ID: FieldName = FieldName::new("id");

/// Request payload for creating or replacing a note.
///
/// Missing fields are treated as empty so they fail validation with the same
/// messages as blank ones.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct NoteRequest {
    #[schema(example = "Groceries")]
    pub title: String,
    #[schema(example = "Milk, eggs and bread")]
    pub content: String,
}

impl TryFrom<NoteRequest> for NoteDraft {
    type Error = crate::domain::NoteValidationError;

    fn try_from(value: NoteRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.title, &value.content)
    }
}

/// Query string for listing notes.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListNotesQuery {
    /// Case-insensitive substring matched against title and content.
    pub q: Option<String>,
}

/// Response payload for a note.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Note> for NoteResponse {
    fn from(value: Note) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title.into(),
            content: value.content.into(),
            summary: value.summary,
            user_id: value.owner.to_string(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// A changed note together with the notice to show the user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteMutationResponse {
    pub note: NoteResponse,
    #[schema(example = "Note created successfully")]
    pub notice: String,
}

/// Notice-only response for deletions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoticeResponse {
    #[schema(example = "Note deleted successfully")]
    pub notice: String,
}

/// Response for deleting every note.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteAllResponse {
    pub deleted: usize,
    #[schema(example = "Successfully deleted 3 note(s)")]
    pub notice: String,
}

/// State of one mutation kind.
#[derive(Debug, Serialize, ToSchema)]
pub struct MutationActivity {
    #[schema(value_type = MutationKindSchema)]
    pub kind: MutationKind,
    #[schema(value_type = MutationStateSchema)]
    pub state: MutationState,
}

fn parse_draft(payload: NoteRequest) -> ApiResult<NoteDraft> {
    NoteDraft::try_from(payload).map_err(map_note_validation_error)
}

fn parse_id(raw: &str) -> ApiResult<NoteId> {
    parse_note_id(raw, NOTE_ID)
}

/// List the caller's notes, optionally filtered by a search term.
#[utoipa::path(
    get,
    path = "/api/v1/notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Notes, most recently updated first", body = [NoteResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "listNotes"
)]
#[get("/notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListNotesQuery>,
) -> ApiResult<web::Json<Vec<NoteResponse>>> {
    let owner = session.require_user_id()?;
    let notes = state
        .notes
        .list_notes(ListNotesRequest {
            owner,
            search: query.into_inner().q,
        })
        .await?;
    Ok(web::Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Created note", body = NoteMutationResponse),
        (status = 400, description = "Invalid note", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Create already in progress", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "createNote"
)]
#[post("/notes")]
pub async fn create_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NoteRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = parse_draft(payload.into_inner())?;
    let outcome = state.notes_command.create_note(&owner, draft).await?;
    Ok(HttpResponse::Created().json(NoteMutationResponse {
        note: outcome.value.into(),
        notice: outcome.notice,
    }))
}

/// Delete every note the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/notes",
    responses(
        (status = 200, description = "Number of deleted notes", body = DeleteAllResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "deleteAllNotes"
)]
#[delete("/notes")]
pub async fn delete_all_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DeleteAllResponse>> {
    let owner = session.require_user_id()?;
    let outcome = state.notes_command.delete_all_notes(&owner).await?;
    Ok(web::Json(DeleteAllResponse {
        deleted: outcome.value,
        notice: outcome.notice,
    }))
}

/// Current state of each mutation kind for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/notes/activity",
    responses(
        (status = 200, description = "Mutation states", body = [MutationActivity]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "noteActivity"
)]
#[get("/notes/activity")]
pub async fn note_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MutationActivity>>> {
    let owner = session.require_user_id()?;
    let activity = state
        .notes
        .mutation_activity(&owner)
        .into_iter()
        .map(|(kind, state)| MutationActivity { kind, state })
        .collect();
    Ok(web::Json(activity))
}

/// Fetch one note.
#[utoipa::path(
    get,
    path = "/api/v1/notes/{id}",
    params(("id" = String, Path, description = "Note identifier")),
    responses(
        (status = 200, description = "Note", body = NoteResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Note not found", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "getNote"
)]
#[get("/notes/{id}")]
pub async fn get_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoteResponse>> {
    let owner = session.require_user_id()?;
    let id = parse_id(&path)?;
    let note = state.notes.get_note(&owner, &id).await?;
    Ok(web::Json(note.into()))
}

/// Replace a note's title and content. The summary is left untouched.
#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    params(("id" = String, Path, description = "Note identifier")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Updated note", body = NoteMutationResponse),
        (status = 400, description = "Invalid note", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Note not found", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "updateNote"
)]
#[put("/notes/{id}")]
pub async fn update_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<NoteRequest>,
) -> ApiResult<web::Json<NoteMutationResponse>> {
    let owner = session.require_user_id()?;
    let id = parse_id(&path)?;
    let draft = parse_draft(payload.into_inner())?;
    let outcome = state.notes_command.update_note(&owner, &id, draft).await?;
    Ok(web::Json(NoteMutationResponse {
        note: outcome.value.into(),
        notice: outcome.notice,
    }))
}

/// Delete a note. Deleting an unknown id succeeds.
#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    params(("id" = String, Path, description = "Note identifier")),
    responses(
        (status = 200, description = "Note deleted", body = NoticeResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "deleteNote"
)]
#[delete("/notes/{id}")]
pub async fn delete_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoticeResponse>> {
    let owner = session.require_user_id()?;
    let id = parse_id(&path)?;
    let outcome = state.notes_command.delete_note(&owner, &id).await?;
    Ok(web::Json(NoticeResponse {
        notice: outcome.notice,
    }))
}

/// Summarize a note's stored content and persist the summary.
#[utoipa::path(
    post,
    path = "/api/v1/notes/{id}/summary",
    params(("id" = String, Path, description = "Note identifier")),
    responses(
        (status = 200, description = "Note with its new summary", body = NoteMutationResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Note not found", body = ErrorSchema),
        (status = 409, description = "Note already has a summary", body = ErrorSchema),
        (status = 500, description = "Summarization not configured", body = ErrorSchema),
        (status = 502, description = "Summarization provider failed", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "generateNoteSummary"
)]
#[post("/notes/{id}/summary")]
pub async fn generate_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoteMutationResponse>> {
    let owner = session.require_user_id()?;
    let id = parse_id(&path)?;
    let outcome = state.notes_command.generate_summary(&owner, &id).await?;
    Ok(web::Json(NoteMutationResponse {
        note: outcome.value.into(),
        notice: outcome.notice,
    }))
}

/// Register the notes handlers on an `/api/v1` scope.
///
/// `activity` is registered ahead of `{id}` so it is not parsed as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_notes)
        .service(create_note)
        .service(delete_all_notes)
        .service(note_activity)
        .service(get_note)
        .service(update_note)
        .service(delete_note)
        .service(generate_summary);
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod tests;
