use async_trait::async_trait;
use serde::Deserialize;

use super::Repository;
use super::model::{Item, ItemSnapshot, ItemView};
use crate::{item, user};

#[derive(Deserialize)]
pub struct CreateItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[async_trait]
pub trait ItemService {
    async fn create(&self, seller: &user::Id, request: CreateItem) -> super::Result<Item>;

    async fn find(&self, id: &item::Id) -> super::Result<Item>;

    async fn find_active(&self, limit: usize) -> super::Result<Vec<Item>>;

    /// Fetches the item's live details; used wherever a thread denormalizes
    /// them, so the snapshot is always current at write time.
    async fn snapshot(&self, id: &item::Id) -> super::Result<ItemSnapshot>;

    async fn mark_sold(&self, id: &item::Id, seller: &user::Id) -> super::Result<()>;

    async fn record_view(&self, user: &user::Id, id: &item::Id) -> super::Result<()>;

    async fn recent_views(&self, user: &user::Id) -> super::Result<Vec<ItemView>>;
}

#[derive(Clone)]
pub struct ItemServiceImpl {
    repo: Repository,
}

impl ItemServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ItemService for ItemServiceImpl {
    async fn create(&self, seller: &user::Id, request: CreateItem) -> super::Result<Item> {
        let item = Item {
            id: item::Id::random(),
            seller_id: seller.to_owned(),
            title: request.title,
            description: request.description,
            category: request.category,
            keywords: request.keywords,
            price_cents: request.price_cents,
            image_url: request.image_url,
            sold: false,
            created_at: chrono::Utc::now().timestamp(),
        };

        self.repo.insert(item.clone()).await?;

        Ok(item)
    }

    async fn find(&self, id: &item::Id) -> super::Result<Item> {
        self.repo.find(id).await
    }

    async fn find_active(&self, limit: usize) -> super::Result<Vec<Item>> {
        self.repo.find_active(limit).await
    }

    async fn snapshot(&self, id: &item::Id) -> super::Result<ItemSnapshot> {
        let item = self.repo.find(id).await?;

        Ok(ItemSnapshot::from(&item))
    }

    async fn mark_sold(&self, id: &item::Id, seller: &user::Id) -> super::Result<()> {
        let item = self.repo.find(id).await?;

        if item.seller_id != *seller {
            return Err(item::Error::NotSeller(id.to_owned()));
        }

        self.repo.mark_sold(id).await
    }

    async fn record_view(&self, user: &user::Id, id: &item::Id) -> super::Result<()> {
        let item = self.repo.find(id).await?;

        self.repo.record_view(user, ItemView::from(&item)).await
    }

    async fn recent_views(&self, user: &user::Id) -> super::Result<Vec<ItemView>> {
        self.repo.recent_views(user).await
    }
}
