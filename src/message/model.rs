use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{item, thread, user};

/// Preview marker for a voice message.
pub const VOICE_PREVIEW: &str = "Voice message";
/// Preview marker for an image; prefixed to the text when both are present.
pub const PHOTO_PREVIEW: &str = "Photo";

/// A single message, always scoped to exactly one item-conversation within
/// its thread. Immutable once created except for growth of `read_by`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Message {
    id: super::Id,
    thread_id: thread::Id,
    item_id: item::Id,
    sender_id: user::Id,
    sender_name: String,
    text: String,
    image_url: Option<String>,
    audio_url: Option<String>,
    timestamp: i64,
    read_by: HashSet<user::Id>,
}

impl Message {
    pub fn new(sender_id: &user::Id, sender_name: &str, request: SendMessage) -> Self {
        Self {
            id: super::Id::random(),
            thread_id: request.thread_id,
            item_id: request.item_id,
            sender_id: sender_id.clone(),
            sender_name: sender_name.to_string(),
            text: request.text.trim().to_string(),
            image_url: request.image_url,
            audio_url: request.audio_url,
            timestamp: chrono::Utc::now().timestamp(),
            read_by: HashSet::from([sender_id.clone()]),
        }
    }
}

impl Message {
    pub const fn id(&self) -> &super::Id {
        &self.id
    }

    pub const fn thread_id(&self) -> &thread::Id {
        &self.thread_id
    }

    pub const fn item_id(&self) -> &item::Id {
        &self.item_id
    }

    pub const fn sender_id(&self) -> &user::Id {
        &self.sender_id
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn image_url(&self) -> Option<&String> {
        self.image_url.as_ref()
    }

    pub const fn audio_url(&self) -> Option<&String> {
        self.audio_url.as_ref()
    }

    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn was_read_by(&self, user: &user::Id) -> bool {
        self.read_by.contains(user)
    }

    pub fn has_attachment(&self) -> bool {
        self.image_url.is_some() || self.audio_url.is_some()
    }

    /// What the thread listing shows as the latest message.
    pub fn preview(&self) -> String {
        if self.audio_url.is_some() {
            return VOICE_PREVIEW.to_string();
        }

        match (&self.image_url, self.text.is_empty()) {
            (Some(_), true) => PHOTO_PREVIEW.to_string(),
            (Some(_), false) => format!("{PHOTO_PREVIEW} {}", self.text),
            _ => self.text.clone(),
        }
    }

    pub(crate) fn mark_read_by(&mut self, user: &user::Id) {
        self.read_by.insert(user.clone());
    }
}

/// Denormalized preview of the most recent message across all items of a
/// thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LastMessage {
    pub text: String,
    pub sender_id: user::Id,
    pub timestamp: i64,
}

impl From<&Message> for LastMessage {
    fn from(message: &Message) -> Self {
        Self {
            text: message.preview(),
            sender_id: message.sender_id.clone(),
            timestamp: message.timestamp,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct SendMessage {
    pub thread_id: thread::Id,
    pub item_id: item::Id,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: super::Id,
    pub thread_id: thread::Id,
    pub item_id: item::Id,
    pub sender_id: user::Id,
    pub sender_name: String,
    pub text: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub timestamp: i64,
    pub read_by: Vec<user::Id>,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        let mut read_by: Vec<user::Id> = message.read_by.iter().cloned().collect();
        read_by.sort();

        Self {
            id: message.id,
            thread_id: message.thread_id.clone(),
            item_id: message.item_id.clone(),
            sender_id: message.sender_id.clone(),
            sender_name: message.sender_name.clone(),
            text: message.text.clone(),
            image_url: message.image_url.clone(),
            audio_url: message.audio_url.clone(),
            timestamp: message.timestamp,
            read_by,
        }
    }
}
