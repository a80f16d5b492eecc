use std::sync::Arc;

use async_trait::async_trait;

use super::model::Message;
use crate::integration::db::Database;
use crate::{item, message, thread, user};

#[async_trait]
pub trait MessageRepository {
    async fn find_by_id(&self, id: &message::Id) -> super::Result<Message>;

    /// One item-conversation, ascending by timestamp.
    async fn find_by_thread_and_item(
        &self,
        thread_id: &thread::Id,
        item_id: &item::Id,
    ) -> super::Result<Vec<Message>>;

    /// Idempotent `read_by` set-add.
    async fn mark_read(&self, id: &message::Id, user: &user::Id) -> super::Result<()>;
}

pub struct InMemoryMessageRepository {
    db: Database,
}

impl InMemoryMessageRepository {
    pub fn new(db: &Database) -> Arc<Self> {
        Self { db: db.clone() }.into()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn find_by_id(&self, id: &message::Id) -> super::Result<Message> {
        self.db
            .with_read(|data| data.messages.iter().find(|m| m.id() == id).cloned())
            .await
            .ok_or(message::Error::NotFound(*id))
    }

    async fn find_by_thread_and_item(
        &self,
        thread_id: &thread::Id,
        item_id: &item::Id,
    ) -> super::Result<Vec<Message>> {
        let mut messages = self
            .db
            .with_read(|data| {
                data.messages
                    .iter()
                    .filter(|m| m.thread_id() == thread_id && m.item_id() == item_id)
                    .cloned()
                    .collect::<Vec<Message>>()
            })
            .await;

        messages.sort_by_key(Message::timestamp);

        Ok(messages)
    }

    async fn mark_read(&self, id: &message::Id, user: &user::Id) -> super::Result<()> {
        self.db
            .transaction(|data| {
                let message = data
                    .messages
                    .iter_mut()
                    .find(|m| m.id() == id)
                    .ok_or(message::Error::NotFound(*id))?;
                message.mark_read_by(user);
                Ok(())
            })
            .await
    }
}
