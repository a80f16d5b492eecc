use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{Item, ItemView};
use crate::{item, user};

#[async_trait]
pub trait ItemRepository {
    async fn insert(&self, item: Item) -> super::Result<()>;

    async fn find(&self, id: &item::Id) -> super::Result<Item>;

    /// Unsold listings, newest first, capped at `limit`.
    async fn find_active(&self, limit: usize) -> super::Result<Vec<Item>>;

    async fn mark_sold(&self, id: &item::Id) -> super::Result<()>;

    async fn record_view(&self, user: &user::Id, view: ItemView) -> super::Result<()>;

    /// Most recent first, bounded by `VIEW_HISTORY_LIMIT`.
    async fn recent_views(&self, user: &user::Id) -> super::Result<Vec<ItemView>>;
}

#[derive(Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<item::Id, Item>>,
    views: RwLock<HashMap<user::Id, VecDeque<ItemView>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Arc<Self> {
        Self::default().into()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: Item) -> super::Result<()> {
        self.items.write().await.insert(item.id.clone(), item);
        Ok(())
    }

    async fn find(&self, id: &item::Id) -> super::Result<Item> {
        let items = self.items.read().await;

        items
            .get(id)
            .cloned()
            .ok_or(item::Error::NotFound(id.to_owned()))
    }

    async fn find_active(&self, limit: usize) -> super::Result<Vec<Item>> {
        let items = self.items.read().await;

        let mut active: Vec<Item> = items.values().filter(|i| !i.sold).cloned().collect();
        active.sort_by_key(|i| std::cmp::Reverse(i.created_at));
        active.truncate(limit);

        Ok(active)
    }

    async fn mark_sold(&self, id: &item::Id) -> super::Result<()> {
        let mut items = self.items.write().await;

        let item = items
            .get_mut(id)
            .ok_or(item::Error::NotFound(id.to_owned()))?;
        item.sold = true;

        Ok(())
    }

    async fn record_view(&self, user: &user::Id, view: ItemView) -> super::Result<()> {
        let mut views = self.views.write().await;
        let history = views.entry(user.to_owned()).or_default();

        // a repeat view moves the item back to the front
        history.retain(|v| v.item_id != view.item_id);
        history.push_front(view);
        history.truncate(super::VIEW_HISTORY_LIMIT);

        Ok(())
    }

    async fn recent_views(&self, user: &user::Id) -> super::Result<Vec<ItemView>> {
        let views = self.views.read().await;

        Ok(views
            .get(user)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default())
    }
}
