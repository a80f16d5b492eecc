use async_trait::async_trait;
use bytes::Bytes;
use log::warn;
use uuid::Uuid;

use super::model::{Message, MessageDto, SendMessage};
use crate::event;
use crate::event::model::Notification;
use crate::integration::storage::Storage;
use crate::item::service::ItemService;
use crate::{item, message, ratelimit, thread, user};

#[async_trait]
pub trait MessageService {
    /// Validates, then appends the message and all thread-side bookkeeping in
    /// a single store transaction. Notifies the recipient after commit.
    async fn send(
        &self,
        sender: &user::Id,
        sender_name: &str,
        request: SendMessage,
    ) -> super::Result<MessageDto>;

    /// Uploads the image first, then sends with the resulting URL. A failed
    /// send deletes the uploaded object best-effort.
    async fn send_with_image(
        &self,
        sender: &user::Id,
        sender_name: &str,
        request: SendMessage,
        image: Bytes,
    ) -> super::Result<MessageDto>;

    /// One item-conversation as seen by `user`: empty when the user has
    /// deleted that item-conversation, even though the messages remain.
    async fn find_by_thread_and_item(
        &self,
        thread_id: &thread::Id,
        item_id: &item::Id,
        user: &user::Id,
    ) -> super::Result<Vec<MessageDto>>;

    async fn mark_read(
        &self,
        thread_id: &thread::Id,
        id: &message::Id,
        user: &user::Id,
    ) -> super::Result<()>;
}

#[derive(Clone)]
pub struct MessageServiceImpl {
    repo: message::Repository,
    thread_repo: thread::Repository,
    item_service: item::Service,
    event_service: event::Service,
    storage: Storage,
    limiter: ratelimit::Limiter,
}

impl MessageServiceImpl {
    pub fn new(
        repo: message::Repository,
        thread_repo: thread::Repository,
        item_service: item::Service,
        event_service: event::Service,
        storage: Storage,
        limiter: ratelimit::Limiter,
    ) -> Self {
        Self {
            repo,
            thread_repo,
            item_service,
            event_service,
            storage,
            limiter,
        }
    }
}

#[async_trait]
impl MessageService for MessageServiceImpl {
    async fn send(
        &self,
        sender: &user::Id,
        sender_name: &str,
        request: SendMessage,
    ) -> super::Result<MessageDto> {
        if request.text.trim().is_empty()
            && request.image_url.is_none()
            && request.audio_url.is_none()
        {
            return Err(message::Error::Empty);
        }

        self.limiter.check(sender, ratelimit::Action::SendMessage)?;

        // live details, never a cached copy
        let snapshot = self.item_service.snapshot(&request.item_id).await?;

        let message = Message::new(sender, sender_name, request);
        let (message, thread) = self.thread_repo.append_message(message, snapshot).await?;

        let dto = MessageDto::from(&message);

        if let Some(recipient) = thread.other_participant(sender) {
            self.event_service.publish(
                &event::Subject::Threads(recipient.clone()),
                &Notification::NewMessage(dto.clone()),
            );
        }
        self.event_service.publish(
            &event::Subject::ItemConversation(
                message.thread_id().clone(),
                message.item_id().clone(),
            ),
            &Notification::NewMessage(dto.clone()),
        );

        Ok(dto)
    }

    async fn send_with_image(
        &self,
        sender: &user::Id,
        sender_name: &str,
        request: SendMessage,
        image: Bytes,
    ) -> super::Result<MessageDto> {
        let path = format!("media/{}", Uuid::new_v4());
        let url = self.storage.upload(image, &path).await?;

        let request = SendMessage {
            image_url: Some(url.clone()),
            ..request
        };

        match self.send(sender, sender_name, request).await {
            Ok(dto) => Ok(dto),
            Err(e) => {
                // best-effort cleanup of the orphaned upload
                if let Err(cleanup) = self.storage.delete(&url).await {
                    warn!("failed to delete orphaned upload {url}: {cleanup}");
                }
                Err(e)
            }
        }
    }

    async fn find_by_thread_and_item(
        &self,
        thread_id: &thread::Id,
        item_id: &item::Id,
        user: &user::Id,
    ) -> super::Result<Vec<MessageDto>> {
        let thread = self.thread_repo.find_by_id(thread_id).await?;

        if !thread.is_participant(user) {
            return Err(thread::Error::NotParticipant.into());
        }
        if thread.is_item_deleted_for(user, item_id) {
            return Ok(Vec::new());
        }

        let messages = self.repo.find_by_thread_and_item(thread_id, item_id).await?;

        Ok(messages.iter().map(MessageDto::from).collect())
    }

    async fn mark_read(
        &self,
        thread_id: &thread::Id,
        id: &message::Id,
        user: &user::Id,
    ) -> super::Result<()> {
        let message = self.repo.find_by_id(id).await?;

        if message.thread_id() != thread_id {
            return Err(message::Error::NotFound(*id));
        }

        let thread = self.thread_repo.find_by_id(thread_id).await?;
        if !thread.is_participant(user) {
            return Err(thread::Error::NotParticipant.into());
        }

        self.repo.mark_read(id, user).await?;

        self.event_service.publish(
            &event::Subject::ItemConversation(
                message.thread_id().clone(),
                message.item_id().clone(),
            ),
            &Notification::MessageRead {
                message_id: *id,
                reader_id: user.clone(),
            },
        );

        Ok(())
    }
}
