//! Port abstraction for profile persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Profile, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Insert `profile` unless one already exists, returning the stored row.
    async fn insert_if_absent(&self, profile: &Profile) -> Result<Profile, ProfileRepositoryError>;

    /// Insert or update `profile`, keeping the original `created_at`.
    async fn upsert(&self, profile: &Profile) -> Result<Profile, ProfileRepositoryError>;
}
