use async_trait::async_trait;

use super::model::Profile;
use super::Repository;
use crate::user;

#[async_trait]
pub trait UserService {
    async fn find_profile(&self, id: &user::Id) -> super::Result<Profile>;

    async fn save_profile(&self, profile: Profile) -> super::Result<()>;
}

#[derive(Clone)]
pub struct UserServiceImpl {
    repo: Repository,
}

impl UserServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn find_profile(&self, id: &user::Id) -> super::Result<Profile> {
        self.repo.find(id).await
    }

    async fn save_profile(&self, profile: Profile) -> super::Result<()> {
        self.repo.upsert(profile).await
    }
}
