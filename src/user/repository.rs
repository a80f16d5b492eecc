use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::Profile;
use crate::user;

#[async_trait]
pub trait ProfileRepository {
    async fn find(&self, id: &user::Id) -> super::Result<Profile>;

    async fn upsert(&self, profile: Profile) -> super::Result<()>;
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<user::Id, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Arc<Self> {
        Self::default().into()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find(&self, id: &user::Id) -> super::Result<Profile> {
        let profiles = self.profiles.read().await;

        profiles
            .get(id)
            .cloned()
            .ok_or(user::Error::NotFound(id.to_owned()))
    }

    async fn upsert(&self, profile: Profile) -> super::Result<()> {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
        Ok(())
    }
}
