use std::sync::Arc;

use async_stream::stream;
use log::warn;
use tokio::sync::broadcast;

use super::Subject;
use super::model::{Notification, NotificationStream};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
struct Event {
    subject: Subject,
    notification: Notification,
}

/// In-process pub/sub. Publishing never blocks and does not require any
/// subscriber to be listening.
pub struct EventService {
    tx: broadcast::Sender<Event>,
}

impl EventService {
    pub fn new() -> Arc<Self> {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }.into()
    }

    pub fn publish(&self, subject: &Subject, notification: &Notification) {
        let _ = self.tx.send(Event {
            subject: subject.clone(),
            notification: notification.clone(),
        });
    }

    pub fn subscribe(&self, subject: &Subject) -> NotificationStream {
        let mut rx = self.tx.subscribe();
        let subject = subject.clone();

        Box::pin(stream! {
            loop {
                match rx.recv().await {
                    Ok(event) if event.subject == subject => yield event.notification,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("notification subscriber lagged, skipped {skipped} events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
