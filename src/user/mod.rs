use std::fmt::Display;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

mod handler;
pub mod identity;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Repository = Arc<dyn repository::ProfileRepository + Send + Sync>;
pub type Service = Arc<dyn service::UserService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/profiles", put(handler::api::upsert))
        .route("/profiles/{id}", get(handler::api::find_one))
        .with_state(s)
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
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
    #[error("profile not found: {0}")]
    NotFound(Id),
    #[error("missing caller identity")]
    MissingIdentity,

    #[error(transparent)]
    _Integration(#[from] crate::integration::Error),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "profile_not_found",
            Self::MissingIdentity => "missing_identity",
            Self::_Integration(e) => e.kind(),
        }
    }
}

