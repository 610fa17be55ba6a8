//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Email, FullName, Profile, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewProfileRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    map_basic_pool_error(error, ProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_basic_diesel_error(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

/// Convert a database row to a domain profile.
///
/// Names too short for the domain type are dropped rather than failing the
/// read, since older rows may carry an empty string.
fn row_to_profile(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    let email = Email::new(row.email).map_err(|err| {
        ProfileRepositoryError::query(format!("stored profile {} is invalid: {err}", row.id))
    })?;
    let full_name = row.full_name.and_then(|name| FullName::new(name).ok());
    Ok(Profile::new(UserId::from_uuid(row.id), email, row.created_at)
        .with_full_name(full_name)
        .with_avatar_url(row.avatar_url))
}

fn new_row(profile: &Profile) -> NewProfileRow<'_> {
    NewProfileRow {
        id: *profile.id.as_uuid(),
        email: profile.email.as_ref(),
        full_name: profile.full_name.as_ref().map(AsRef::as_ref),
        avatar_url: profile.avatar_url.as_deref(),
        created_at: profile.created_at,
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::id.eq(id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn insert_if_absent(&self, profile: &Profile) -> Result<Profile, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(profiles::table)
            .values(&new_row(profile))
            .on_conflict(profiles::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let row: ProfileRow = profiles::table
            .filter(profiles::id.eq(profile.id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_profile(row)
    }

    async fn upsert(&self, profile: &Profile) -> Result<Profile, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: ProfileRow = diesel::insert_into(profiles::table)
            .values(&new_row(profile))
            .on_conflict(profiles::id)
            .do_update()
            .set((
                profiles::email.eq(excluded(profiles::email)),
                profiles::full_name.eq(excluded(profiles::full_name)),
                profiles::avatar_url.eq(excluded(profiles::avatar_url)),
                profiles::updated_at.eq(excluded(profiles::updated_at)),
            ))
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_profile(row)
    }
}
