use std::fmt::Display;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Repository = Arc<dyn repository::ItemRepository + Send + Sync>;
pub type Service = Arc<dyn service::ItemService + Send + Sync>;

/// Number of recently viewed items kept per user, newest first.
pub const VIEW_HISTORY_LIMIT: usize = 20;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/items", post(handler::api::create))
        .route("/items/{id}", get(handler::api::find_one))
        .route("/items/{id}/view", post(handler::api::record_view))
        .route("/items/{id}/sold", put(handler::api::mark_sold))
        .with_state(s)
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("item not found: {0}")]
    NotFound(Id),
    #[error("only the seller can update item {0}")]
    NotSeller(Id),

    #[error(transparent)]
    _Integration(#[from] crate::integration::Error),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "item_not_found",
            Self::NotSeller(_) => "not_seller",
            Self::_Integration(e) => e.kind(),
        }
    }
}

