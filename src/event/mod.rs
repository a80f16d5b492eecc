use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;
use crate::{item, thread, user};

mod handler;
pub mod model;
pub mod service;

pub type Service = Arc<service::EventService>;

pub fn endpoints<S>(s: AppState) -> Router<S> {
    Router::new().route("/ws", get(handler::ws)).with_state(s)
}

/// Fan-in address of a notification: either everything relevant to one user's
/// thread listing, or one item-conversation within a thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subject {
    Threads(user::Id),
    ItemConversation(thread::Id, item::Id),
}
