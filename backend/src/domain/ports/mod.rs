//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod identity_provider;
mod note_repository;
mod notes_command;
mod notes_query;
mod profile_repository;
mod summarize_command;
mod summary_provider;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockUserProfileQuery};
pub use account_command::{AccountCommand, AccountSession, UserProfileQuery};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use note_repository::MockNoteRepository;
pub use note_repository::{NoteRepository, NoteRepositoryError};
#[cfg(test)]
pub use notes_command::MockNotesCommand;
pub use notes_command::{MutationOutcome, NotesCommand};
#[cfg(test)]
pub use notes_query::MockNotesQuery;
pub use notes_query::{ListNotesRequest, NotesQuery};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use summarize_command::MockSummarizeCommand;
pub use summarize_command::SummarizeCommand;
#[cfg(test)]
pub use summary_provider::MockSummaryProvider;
pub use summary_provider::{SummaryProvider, SummaryProviderError, SummaryRequest};
