use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::message::model::MessageDto;
use crate::thread::model::ThreadDto;
use crate::{message, user};

pub type NotificationStream = Pin<Box<dyn Stream<Item = Notification> + Send>>;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    NewThread(ThreadDto),
    NewMessage(MessageDto),
    MessageRead {
        message_id: message::Id,
        reader_id: user::Id,
    },
}
