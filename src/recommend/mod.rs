use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::item;
use crate::state::AppState;

mod handler;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Service = Arc<dyn service::RecommendService + Send + Sync>;

/// Upper bound on the number of recommended items.
pub const MAX_RECOMMENDATIONS: usize = 8;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/recommendations", get(handler::api::find_for_user))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Item(#[from] item::Error),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::_Item(e) => e.kind(),
        }
    }
}
