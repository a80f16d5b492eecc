use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;

use super::model::Thread;
use crate::integration::db::Database;
use crate::item::model::ItemSnapshot;
use crate::message::model::Message;
use crate::{item, thread, user};

#[async_trait]
pub trait ThreadRepository {
    async fn find_by_id(&self, id: &thread::Id) -> super::Result<Thread>;

    /// All threads the user participates in, most recent activity first.
    /// Includes threads the user has soft-deleted; the service filters those.
    async fn find_by_participant(&self, user: &user::Id) -> super::Result<Vec<Thread>>;

    /// Existence check and insert in one transaction, so concurrent first
    /// contact between the same pair resolves to a single document. Returns
    /// the stored thread and whether this call created it.
    async fn create_if_absent(&self, thread: Thread) -> super::Result<(Thread, bool)>;

    async fn note_discussed_item(&self, id: &thread::Id, item: &item::Id)
    -> super::Result<Thread>;

    /// One transaction covering all effects of a send: message insert, thread
    /// preview + snapshot update, seen-set reset, recipient undelete and
    /// recipient unread marking. Rejects blocked threads and non-participant
    /// senders without writing anything.
    async fn append_message(
        &self,
        message: Message,
        snapshot: ItemSnapshot,
    ) -> super::Result<(Message, Thread)>;

    async fn mark_seen(&self, id: &thread::Id, user: &user::Id) -> super::Result<()>;

    async fn mark_item_read(
        &self,
        id: &thread::Id,
        user: &user::Id,
        item: &item::Id,
    ) -> super::Result<()>;

    async fn delete_for(&self, id: &thread::Id, user: &user::Id) -> super::Result<()>;

    async fn delete_item_conversation_for(
        &self,
        id: &thread::Id,
        user: &user::Id,
        item: &item::Id,
    ) -> super::Result<()>;

    async fn block(&self, id: &thread::Id, blocker: &user::Id) -> super::Result<()>;

    async fn unblock(&self, id: &thread::Id) -> super::Result<()>;
}

pub struct InMemoryThreadRepository {
    db: Database,
}

impl InMemoryThreadRepository {
    pub fn new(db: &Database) -> Arc<Self> {
        Self { db: db.clone() }.into()
    }

    async fn update(
        &self,
        id: &thread::Id,
        f: impl FnOnce(&mut Thread) + Send,
    ) -> super::Result<()> {
        self.db
            .transaction(|data| {
                let t = data
                    .threads
                    .get_mut(id)
                    .ok_or(thread::Error::NotFound(id.to_owned()))?;
                f(t);
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl ThreadRepository for InMemoryThreadRepository {
    async fn find_by_id(&self, id: &thread::Id) -> super::Result<Thread> {
        self.db
            .with_read(|data| data.threads.get(id).cloned())
            .await
            .ok_or(thread::Error::NotFound(id.to_owned()))
    }

    async fn find_by_participant(&self, user: &user::Id) -> super::Result<Vec<Thread>> {
        let mut threads = self
            .db
            .with_read(|data| {
                data.threads
                    .values()
                    .filter(|t| t.is_participant(user))
                    .cloned()
                    .collect::<Vec<Thread>>()
            })
            .await;

        threads.sort_by_key(|t| Reverse(t.last_activity_at()));

        Ok(threads)
    }

    async fn create_if_absent(&self, thread: Thread) -> super::Result<(Thread, bool)> {
        self.db
            .transaction(|data| {
                use std::collections::hash_map::Entry;

                match data.threads.entry(thread.id().clone()) {
                    Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
                    Entry::Vacant(slot) => Ok((slot.insert(thread).clone(), true)),
                }
            })
            .await
    }

    async fn note_discussed_item(
        &self,
        id: &thread::Id,
        item: &item::Id,
    ) -> super::Result<Thread> {
        self.db
            .transaction(|data| {
                let t = data
                    .threads
                    .get_mut(id)
                    .ok_or(thread::Error::NotFound(id.to_owned()))?;
                t.note_discussed_item(item);
                Ok(t.clone())
            })
            .await
    }

    async fn append_message(
        &self,
        message: Message,
        snapshot: ItemSnapshot,
    ) -> super::Result<(Message, Thread)> {
        self.db
            .transaction(|data| {
                let t = data
                    .threads
                    .get_mut(message.thread_id())
                    .ok_or(thread::Error::NotFound(message.thread_id().to_owned()))?;

                if !t.is_participant(message.sender_id()) {
                    return Err(thread::Error::NotParticipant);
                }
                if t.blocked_by().is_some() {
                    return Err(thread::Error::Blocked);
                }

                let recipient = t
                    .other_participant(message.sender_id())
                    .ok_or(thread::Error::NotParticipant)?
                    .clone();

                t.apply_append(&message, snapshot, &recipient);
                let thread = t.clone();
                data.messages.push(message.clone());

                Ok((message, thread))
            })
            .await
    }

    async fn mark_seen(&self, id: &thread::Id, user: &user::Id) -> super::Result<()> {
        self.update(id, |t| t.mark_seen_by(user)).await
    }

    async fn mark_item_read(
        &self,
        id: &thread::Id,
        user: &user::Id,
        item: &item::Id,
    ) -> super::Result<()> {
        self.update(id, |t| t.mark_item_read(user, item)).await
    }

    async fn delete_for(&self, id: &thread::Id, user: &user::Id) -> super::Result<()> {
        self.update(id, |t| t.delete_for(user)).await
    }

    async fn delete_item_conversation_for(
        &self,
        id: &thread::Id,
        user: &user::Id,
        item: &item::Id,
    ) -> super::Result<()> {
        self.update(id, |t| t.delete_item_conversation_for(user, item))
            .await
    }

    async fn block(&self, id: &thread::Id, blocker: &user::Id) -> super::Result<()> {
        self.update(id, |t| t.block(blocker)).await
    }

    async fn unblock(&self, id: &thread::Id) -> super::Result<()> {
        self.update(id, |t| t.unblock()).await
    }
}
