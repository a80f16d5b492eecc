use async_trait::async_trait;

use super::model::{Thread, ThreadDto};
use crate::event;
use crate::event::model::Notification;
use crate::user::service::UserService;
use crate::{item, ratelimit, thread, user};

#[async_trait]
pub trait ThreadService {
    /// Returns the existing thread between the two users or lazily creates
    /// it. When `item` is given it is registered as discussed.
    async fn create_or_get(
        &self,
        current: &user::Id,
        other: &user::Id,
        item: Option<&item::Id>,
    ) -> super::Result<ThreadDto>;

    /// The user's thread listing, excluding threads they soft-deleted.
    async fn find_all(&self, user: &user::Id) -> super::Result<Vec<ThreadDto>>;

    async fn find_by_id(&self, id: &thread::Id, user: &user::Id) -> super::Result<ThreadDto>;

    async fn mark_seen(&self, id: &thread::Id, user: &user::Id) -> super::Result<()>;

    async fn mark_item_read(
        &self,
        id: &thread::Id,
        item: &item::Id,
        user: &user::Id,
    ) -> super::Result<()>;

    async fn delete_for(&self, id: &thread::Id, user: &user::Id) -> super::Result<()>;

    async fn delete_item_conversation(
        &self,
        id: &thread::Id,
        item: &item::Id,
        user: &user::Id,
    ) -> super::Result<()>;

    async fn block(&self, id: &thread::Id, blocker: &user::Id) -> super::Result<()>;

    async fn unblock(&self, id: &thread::Id, user: &user::Id) -> super::Result<()>;
}

#[derive(Clone)]
pub struct ThreadServiceImpl {
    repo: thread::Repository,
    user_service: user::Service,
    event_service: event::Service,
    limiter: ratelimit::Limiter,
}

impl ThreadServiceImpl {
    pub fn new(
        repo: thread::Repository,
        user_service: user::Service,
        event_service: event::Service,
        limiter: ratelimit::Limiter,
    ) -> Self {
        Self {
            repo,
            user_service,
            event_service,
            limiter,
        }
    }
}

#[async_trait]
impl ThreadService for ThreadServiceImpl {
    async fn create_or_get(
        &self,
        current: &user::Id,
        other: &user::Id,
        item: Option<&item::Id>,
    ) -> super::Result<ThreadDto> {
        if current.is_empty() || other.is_empty() || current == other {
            return Err(thread::Error::InvalidParticipants);
        }

        self.limiter.check(current, ratelimit::Action::CreateThread)?;

        let me = self.user_service.find_profile(current).await?;
        let them = self.user_service.find_profile(other).await?;

        let (mut thread, created) = self.repo.create_if_absent(Thread::new(&me, &them)).await?;

        if let Some(item_id) = item {
            if !thread.discussed_item_ids().contains(item_id) {
                thread = self.repo.note_discussed_item(thread.id(), item_id).await?;
            }
        }

        if created {
            let for_them = to_dto(&thread, other)?;
            self.event_service.publish(
                &event::Subject::Threads(other.clone()),
                &Notification::NewThread(for_them),
            );
        }

        to_dto(&thread, current)
    }

    async fn find_all(&self, user: &user::Id) -> super::Result<Vec<ThreadDto>> {
        let threads = self.repo.find_by_participant(user).await?;

        threads
            .iter()
            .filter(|t| !t.is_deleted_for(user))
            .map(|t| to_dto(t, user))
            .collect()
    }

    async fn find_by_id(&self, id: &thread::Id, user: &user::Id) -> super::Result<ThreadDto> {
        let thread = self.repo.find_by_id(id).await?;

        to_dto(&thread, user)
    }

    async fn mark_seen(&self, id: &thread::Id, user: &user::Id) -> super::Result<()> {
        self.check_participant(id, user).await?;
        self.repo.mark_seen(id, user).await
    }

    async fn mark_item_read(
        &self,
        id: &thread::Id,
        item: &item::Id,
        user: &user::Id,
    ) -> super::Result<()> {
        self.check_participant(id, user).await?;
        self.repo.mark_item_read(id, user, item).await
    }

    async fn delete_for(&self, id: &thread::Id, user: &user::Id) -> super::Result<()> {
        self.check_participant(id, user).await?;
        self.repo.delete_for(id, user).await
    }

    async fn delete_item_conversation(
        &self,
        id: &thread::Id,
        item: &item::Id,
        user: &user::Id,
    ) -> super::Result<()> {
        self.check_participant(id, user).await?;
        self.repo.delete_item_conversation_for(id, user, item).await
    }

    async fn block(&self, id: &thread::Id, blocker: &user::Id) -> super::Result<()> {
        self.check_participant(id, blocker).await?;
        self.repo.block(id, blocker).await
    }

    async fn unblock(&self, id: &thread::Id, user: &user::Id) -> super::Result<()> {
        self.check_participant(id, user).await?;
        self.repo.unblock(id).await
    }
}

impl ThreadServiceImpl {
    async fn check_participant(&self, id: &thread::Id, user: &user::Id) -> super::Result<()> {
        let thread = self.repo.find_by_id(id).await?;

        if !thread.is_participant(user) {
            return Err(thread::Error::NotParticipant);
        }

        Ok(())
    }
}

pub(super) fn to_dto(t: &Thread, me: &user::Id) -> super::Result<ThreadDto> {
    let recipient = t
        .other_participant(me)
        .ok_or(thread::Error::NotParticipant)?;

    let discussed_item_ids = t
        .discussed_item_ids()
        .iter()
        .filter(|i| !t.is_item_deleted_for(me, i))
        .cloned()
        .collect();

    Ok(ThreadDto {
        id: t.id().clone(),
        recipient_id: recipient.clone(),
        recipient_name: t.name_of(recipient).unwrap_or_default().to_string(),
        recipient_avatar: t.avatar_of(recipient).unwrap_or_default().to_string(),
        discussed_item_ids,
        unread_item_ids: t.unread_items_for(me),
        seen_latest: t.has_seen_latest(me),
        last_message: t.last_message().cloned(),
        item: t.item().cloned(),
        blocked: t.blocked_by().is_some(),
        created_at: t.created_at(),
    })
}
