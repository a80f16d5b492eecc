use axum::extract::ws::{Message as WsMessage, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use log::{debug, error};
use serde::Deserialize;

use crate::event;
use crate::thread::service::ThreadService;
use crate::user::identity::Identity;
use crate::{item, thread};

#[derive(Deserialize)]
pub struct SubscribeParams {
    #[serde(default)]
    pub thread_id: Option<thread::Id>,
    #[serde(default)]
    pub item_id: Option<item::Id>,
}

/// Live subscription endpoint. Without parameters the socket streams the
/// caller's thread notifications; with `thread_id` and `item_id` it streams
/// one item-conversation.
pub async fn ws(
    Identity(logged_id): Identity,
    Query(params): Query<SubscribeParams>,
    State(event_service): State<event::Service>,
    State(thread_service): State<thread::Service>,
    ws: WebSocketUpgrade,
) -> crate::Result<Response> {
    let subject = match (params.thread_id, params.item_id) {
        (Some(thread_id), Some(item_id)) => {
            // participants only
            thread_service.find_by_id(&thread_id, &logged_id).await?;
            event::Subject::ItemConversation(thread_id, item_id)
        }
        _ => event::Subject::Threads(logged_id),
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, subject, event_service)))
}

async fn handle_socket(ws: WebSocket, subject: event::Subject, event_service: event::Service) {
    let (mut sender, mut receiver) = ws.split();
    let mut notifications = event_service.subscribe(&subject);

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                None | Some(Ok(WsMessage::Close(_))) => {
                    debug!("WS connection closed by client");
                    break;
                }
                Some(Err(e)) => {
                    error!("failed to read WS frame: {e}");
                    break;
                }
                // this endpoint only pushes
                Some(Ok(_)) => continue,
            },
            noti = notifications.next() => match noti {
                None => break,
                Some(noti) => match serde_json::to_string(&noti) {
                    Ok(payload) => {
                        if let Err(e) = sender.send(WsMessage::Text(payload.into())).await {
                            error!("failed to push notification: {e}");
                            break;
                        }
                    }
                    Err(e) => error!("failed to serialize notification: {e}"),
                },
            },
        }
    }
}
