use std::fmt::Display;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use crate::{integration, item, ratelimit, thread};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Repository = Arc<dyn repository::MessageRepository + Send + Sync>;
pub type Service = Arc<dyn service::MessageService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/messages", post(handler::api::create))
        .route("/messages/image", post(handler::api::create_with_image))
        .route("/messages", get(handler::api::find_all))
        .route("/messages/{id}/read", put(handler::api::mark_read))
        .with_state(s)
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("message has neither text nor an attachment")]
    Empty,
    #[error("message not found: {0}")]
    NotFound(Id),

    #[error(transparent)]
    _Thread(#[from] thread::Error),
    #[error(transparent)]
    _Item(#[from] item::Error),
    #[error(transparent)]
    _RateLimit(#[from] ratelimit::Error),
    #[error(transparent)]
    _Integration(#[from] integration::Error),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty_message",
            Self::NotFound(_) => "message_not_found",
            Self::_Thread(e) => e.kind(),
            Self::_Item(e) => e.kind(),
            Self::_RateLimit(_) => "rate_limited",
            Self::_Integration(e) => e.kind(),
        }
    }
}
