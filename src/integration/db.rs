use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::message::model::Message;
use crate::thread;
use crate::thread::model::Thread;

/// In-process stand-in for the platform document store. A thread and its
/// message sub-collection live in the same store so that a single
/// transaction can span both.
#[derive(Clone, Default)]
pub struct Database {
    data: Arc<RwLock<Data>>,
}

#[derive(Default)]
pub struct Data {
    pub threads: HashMap<thread::Id, Thread>,
    pub messages: Vec<Message>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single atomic read-modify-write. Repositories express every state
    /// transition through this; there is no other mutation path.
    pub async fn transaction<T, E>(
        &self,
        f: impl FnOnce(&mut Data) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let mut data = self.data.write().await;
        f(&mut data)
    }

    pub async fn with_read<T>(&self, f: impl FnOnce(&Data) -> T) -> T {
        let data = self.data.read().await;
        f(&data)
    }
}
