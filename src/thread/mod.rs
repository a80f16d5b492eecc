use std::fmt::Display;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::{integration, item, ratelimit, user};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub type Repository = Arc<dyn repository::ThreadRepository + Send + Sync>;
pub type Service = Arc<dyn service::ThreadService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/threads", post(handler::api::create_or_get))
        .route("/threads", get(handler::api::find_all))
        .route("/threads/{id}", get(handler::api::find_one))
        .route("/threads/{id}", delete(handler::api::delete))
        .route("/threads/{id}/seen", put(handler::api::mark_seen))
        .route(
            "/threads/{id}/items/{item_id}/read",
            put(handler::api::mark_item_read),
        )
        .route(
            "/threads/{id}/items/{item_id}",
            delete(handler::api::delete_item_conversation),
        )
        .route("/threads/{id}/block", post(handler::api::block))
        .route("/threads/{id}/block", delete(handler::api::unblock))
        .with_state(s)
}

/// Thread id: order-independent function of the two participant ids, so any
/// unordered pair of users resolves to at most one thread.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn of(a: &user::Id, b: &user::Id) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{first}_{second}"))
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

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("threads require two distinct non-empty participant ids")]
    InvalidParticipants,
    #[error("thread not found: {0}")]
    NotFound(Id),
    #[error("conversation is blocked")]
    Blocked,
    #[error("user is not a participant of this thread")]
    NotParticipant,

    #[error(transparent)]
    _User(#[from] user::Error),
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
            Self::InvalidParticipants => "invalid_participants",
            Self::NotFound(_) => "thread_not_found",
            Self::Blocked => "conversation_blocked",
            Self::NotParticipant => "not_participant",
            Self::_User(e) => e.kind(),
            Self::_Item(e) => e.kind(),
            Self::_RateLimit(_) => "rate_limited",
            Self::_Integration(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Id;
    use crate::user;

    #[test]
    fn id_is_order_independent() {
        let alice = user::Id::from("alice");
        let bob = user::Id::from("bob");

        assert_eq!(Id::of(&alice, &bob), Id::of(&bob, &alice));
    }

    #[test]
    fn id_is_deterministic() {
        let alice = user::Id::from("alice");
        let bob = user::Id::from("bob");

        assert_eq!(Id::of(&alice, &bob), Id::of(&alice, &bob));
        assert_eq!(Id::of(&alice, &bob).as_str(), "alice_bob");
    }

    #[test]
    fn distinct_pairs_get_distinct_ids() {
        let alice = user::Id::from("alice");
        let bob = user::Id::from("bob");
        let carol = user::Id::from("carol");

        assert_ne!(Id::of(&alice, &bob), Id::of(&alice, &carol));
    }
}
