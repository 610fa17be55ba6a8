//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Note, NoteDraft: validated note aggregate and its inputs.
//! - Profile, UserId, Email: identity-linked profile data.
//! - NotesService, SummarizationService, AccountService: driving port
//!   implementations consumed by inbound adapters.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod mutation_tracker;
pub mod note;
pub mod notes_service;
pub mod ports;
pub mod query_cache;
pub mod route_guard;
pub mod search;
pub mod summarization;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, PROFILE_UNAVAILABLE_MESSAGE};
pub use self::auth::{
    AuthenticatedIdentity, CredentialsValidationError, LoginCredentials, Registration,
};
pub use self::error::{Error, ErrorCode};
pub use self::mutation_tracker::{MutationKind, MutationState, MutationTracker};
pub use self::note::{Note, NoteContent, NoteDraft, NoteId, NoteTitle, NoteValidationError};
pub use self::notes_service::NotesService;
pub use self::summarization::SummarizationService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, FullName, Profile, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use notes_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
