//! Note aggregate and its validated parts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;

/// Validation errors for note drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    TitleRequired,
    TitleTooLong { max: usize },
    ContentRequired,
}

impl NoteValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleRequired | Self::TitleTooLong { .. } => "title",
            Self::ContentRequired => "content",
        }
    }

    /// Stable machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TitleRequired => "title_required",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::ContentRequired => "content_required",
        }
    }
}

impl fmt::Display for NoteValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "Title is required"),
            Self::TitleTooLong { .. } => write!(f, "Title is too long"),
            Self::ContentRequired => write!(f, "Content is required"),
        }
    }
}

impl std::error::Error for NoteValidationError {}

/// Storage-assigned note identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for NoteId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Note title: non-blank and at most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteTitle(String);

impl NoteTitle {
    pub fn new(title: impl Into<String>) -> Result<Self, NoteValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(NoteValidationError::TitleRequired);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(NoteValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for NoteTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NoteTitle> for String {
    fn from(value: NoteTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for NoteTitle {
    type Error = NoteValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Note body: non-blank free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteContent(String);

impl NoteContent {
    pub fn new(content: impl Into<String>) -> Result<Self, NoteValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(NoteValidationError::ContentRequired);
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for NoteContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NoteContent> for String {
    fn from(value: NoteContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for NoteContent {
    type Error = NoteValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated title and content submitted for create or edit.
///
/// # Examples
/// ```
/// use notes_backend::domain::NoteDraft;
///
/// let draft = NoteDraft::try_from_parts("Groceries", "eggs, milk").unwrap();
/// assert_eq!(draft.title.as_ref(), "Groceries");
/// assert!(NoteDraft::try_from_parts("  ", "body").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: NoteTitle,
    pub content: NoteContent,
}

impl NoteDraft {
    /// Validate raw inputs; the title is checked first.
    pub fn try_from_parts(title: &str, content: &str) -> Result<Self, NoteValidationError> {
        Ok(Self {
            title: NoteTitle::new(title)?,
            content: NoteContent::new(content)?,
        })
    }
}

/// A user's note.
///
/// ## Invariants
/// - `summary` is `None` until exactly one summarization succeeds.
/// - `updated_at >= created_at`.
/// - Editing never touches `summary`; summarizing never touches `title` or
///   `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub owner: UserId,
    pub title: NoteTitle,
    pub content: NoteContent,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Build a note that has not been summarized yet.
    pub fn from_draft(id: NoteId, owner: UserId, draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            title: draft.title,
            content: draft.content,
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match over title and content.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.title.as_ref().to_lowercase().contains(needle_lowercase)
            || self.content.as_ref().to_lowercase().contains(needle_lowercase)
    }
}
