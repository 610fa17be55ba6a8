//! In-memory `ProfileRepository`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, UserId};

use super::lock;

#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<UserId, Profile>>,
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(lock(&self.profiles).get(id).cloned())
    }

    async fn insert_if_absent(&self, profile: &Profile) -> Result<Profile, ProfileRepositoryError> {
        Ok(lock(&self.profiles)
            .entry(profile.id.clone())
            .or_insert_with(|| profile.clone())
            .clone())
    }

    async fn upsert(&self, profile: &Profile) -> Result<Profile, ProfileRepositoryError> {
        let mut profiles = lock(&self.profiles);
        let stored = profiles
            .entry(profile.id.clone())
            .and_modify(|existing| {
                existing.email = profile.email.clone();
                existing.full_name = profile.full_name.clone();
                existing.avatar_url = profile.avatar_url.clone();
            })
            .or_insert_with(|| profile.clone());
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Email;
    use chrono::{TimeDelta, Utc};

    fn profile(id: &UserId, email: &str) -> Profile {
        Profile::new(id.clone(), Email::new(email).expect("email"), Utc::now())
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first_row() {
        let repo = InMemoryProfileRepository::default();
        let id = UserId::random();
        repo.insert_if_absent(&profile(&id, "first@example.com"))
            .await
            .expect("insert");
        let stored = repo
            .insert_if_absent(&profile(&id, "second@example.com"))
            .await
            .expect("second insert");
        assert_eq!(stored.email.as_ref(), "first@example.com");
    }

    #[tokio::test]
    async fn upsert_updates_without_duplicating() {
        let repo = InMemoryProfileRepository::default();
        let id = UserId::random();
        let mut original = profile(&id, "first@example.com");
        original.created_at = Utc::now() - TimeDelta::days(1);
        repo.insert_if_absent(&original).await.expect("insert");

        let stored = repo
            .upsert(&profile(&id, "second@example.com"))
            .await
            .expect("upsert");

        assert_eq!(stored.email.as_ref(), "second@example.com");
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(lock(&repo.profiles).len(), 1);
    }
}
