use serde::{Deserialize, Serialize};

use super::Id;
use crate::user;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: Id,
    pub seller_id: user::Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sold: bool,
    pub created_at: i64,
}

/// Live projection of the item details a thread denormalizes. Recomputed from
/// the item store on every write, never cached on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub item_id: Id,
    pub title: String,
    pub image_url: Option<String>,
    pub seller_id: user::Id,
}

impl From<&Item> for ItemSnapshot {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            seller_id: item.seller_id.clone(),
        }
    }
}

/// One entry of a user's bounded view history, the input of the
/// recommendation filter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemView {
    pub item_id: Id,
    pub category: String,
    pub keywords: Vec<String>,
    pub viewed_at: i64,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            category: item.category.clone(),
            keywords: item.keywords.clone(),
            viewed_at: chrono::Utc::now().timestamp(),
        }
    }
}
