use std::sync::Arc;

use axum::extract::FromRef;

use crate::event::service::EventService;
use crate::integration;
use crate::integration::db::Database;
use crate::integration::storage::InMemoryObjectStorage;
use crate::item::repository::InMemoryItemRepository;
use crate::item::service::ItemServiceImpl;
use crate::message::repository::InMemoryMessageRepository;
use crate::message::service::MessageServiceImpl;
use crate::ratelimit::SlidingWindow;
use crate::recommend::service::RecommendServiceImpl;
use crate::thread::repository::InMemoryThreadRepository;
use crate::thread::service::ThreadServiceImpl;
use crate::user::repository::InMemoryProfileRepository;
use crate::user::service::UserServiceImpl;
use crate::{event, item, message, recommend, thread, user};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub user_service: user::Service,
    pub item_service: item::Service,
    pub thread_service: thread::Service,
    pub message_service: message::Service,
    pub recommend_service: recommend::Service,
    pub event_service: event::Service,
}

impl AppState {
    pub fn init(config: &integration::Config) -> Self {
        let db = Database::new();
        let event_service: event::Service = EventService::new();
        let limiter = SlidingWindow::new(config.rate_limit.clone());
        let storage = InMemoryObjectStorage::new();

        let user_service: user::Service =
            Arc::new(UserServiceImpl::new(InMemoryProfileRepository::new()));
        let item_service: item::Service =
            Arc::new(ItemServiceImpl::new(InMemoryItemRepository::new()));

        let thread_repo = InMemoryThreadRepository::new(&db);
        let thread_service: thread::Service = Arc::new(ThreadServiceImpl::new(
            thread_repo.clone(),
            user_service.clone(),
            event_service.clone(),
            limiter.clone(),
        ));

        let message_service: message::Service = Arc::new(MessageServiceImpl::new(
            InMemoryMessageRepository::new(&db),
            thread_repo,
            item_service.clone(),
            event_service.clone(),
            storage,
            limiter,
        ));

        let recommend_service: recommend::Service =
            Arc::new(RecommendServiceImpl::new(item_service.clone()));

        Self {
            user_service,
            item_service,
            thread_service,
            message_service,
            recommend_service,
            event_service,
        }
    }
}
