use std::collections::HashSet;

use async_trait::async_trait;

use super::MAX_RECOMMENDATIONS;
use crate::item::model::{Item, ItemView};
use crate::item::service::ItemService;
use crate::{item, user};

/// How many active listings are considered per request.
const CANDIDATE_POOL_LIMIT: usize = 100;

#[async_trait]
pub trait RecommendService {
    /// Up to `MAX_RECOMMENDATIONS` active listings similar to the user's
    /// recently viewed items. An empty history yields an empty result rather
    /// than an error: no recommendation beats a wrong one.
    async fn find_for_user(&self, user: &user::Id) -> super::Result<Vec<Item>>;
}

#[derive(Clone)]
pub struct RecommendServiceImpl {
    item_service: item::Service,
}

impl RecommendServiceImpl {
    pub fn new(item_service: item::Service) -> Self {
        Self { item_service }
    }
}

#[async_trait]
impl RecommendService for RecommendServiceImpl {
    async fn find_for_user(&self, user: &user::Id) -> super::Result<Vec<Item>> {
        let history = self.item_service.recent_views(user).await?;
        if history.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.item_service.find_active(CANDIDATE_POOL_LIMIT).await?;

        Ok(rank(&history, candidates, user))
    }
}

/// Pure filter/rank over a bounded candidate pool: drop the user's own
/// listings, already viewed ids and sold items, then order by category and
/// keyword similarity to the view history.
pub fn rank(history: &[ItemView], candidates: Vec<Item>, user: &user::Id) -> Vec<Item> {
    if history.is_empty() || candidates.is_empty() {
        return Vec::new();
    }

    let viewed: HashSet<&item::Id> = history.iter().map(|v| &v.item_id).collect();
    let categories: HashSet<&str> = history.iter().map(|v| v.category.as_str()).collect();
    let keywords: HashSet<&str> = history
        .iter()
        .flat_map(|v| v.keywords.iter().map(String::as_str))
        .collect();

    let mut scored: Vec<(u32, Item)> = candidates
        .into_iter()
        .filter(|c| !c.sold && c.seller_id != *user && !viewed.contains(&c.id))
        .filter_map(|c| {
            let score = similarity(&c, &categories, &keywords);
            (score > 0).then_some((score, c))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(_, c)| c)
        .collect()
}

fn similarity(candidate: &Item, categories: &HashSet<&str>, keywords: &HashSet<&str>) -> u32 {
    let mut score = 0;

    if categories.contains(candidate.category.as_str()) {
        score += 2;
    }

    score += candidate
        .keywords
        .iter()
        .filter(|k| keywords.contains(k.as_str()))
        .count() as u32;

    score
}
