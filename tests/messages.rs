use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;

use marketplace_service::event::model::Notification;
use marketplace_service::event::service::EventService;
use marketplace_service::event::Subject;
use marketplace_service::integration::db::Database;
use marketplace_service::integration::storage::InMemoryObjectStorage;
use marketplace_service::item::repository::InMemoryItemRepository;
use marketplace_service::item::service::{CreateItem, ItemService, ItemServiceImpl};
use marketplace_service::message::model::{SendMessage, PHOTO_PREVIEW, VOICE_PREVIEW};
use marketplace_service::message::repository::InMemoryMessageRepository;
use marketplace_service::message::service::{MessageService, MessageServiceImpl};
use marketplace_service::ratelimit::{Config as RateLimit, SlidingWindow};
use marketplace_service::thread::repository::InMemoryThreadRepository;
use marketplace_service::thread::service::{ThreadService, ThreadServiceImpl};
use marketplace_service::user::model::Profile;
use marketplace_service::user::repository::InMemoryProfileRepository;
use marketplace_service::user::service::{UserService, UserServiceImpl};
use marketplace_service::{event, item, message, thread, user};

struct TestApp {
    user_service: user::Service,
    item_service: item::Service,
    thread_service: thread::Service,
    message_service: message::Service,
    event_service: event::Service,
    storage: Arc<InMemoryObjectStorage>,
}

fn setup() -> TestApp {
    let db = Database::new();
    let event_service = EventService::new();
    let limiter = SlidingWindow::new(RateLimit {
        cap: 1000,
        window: Duration::from_secs(60),
    });
    let storage = InMemoryObjectStorage::new();

    let user_service: user::Service =
        Arc::new(UserServiceImpl::new(InMemoryProfileRepository::new()));
    let item_service: item::Service = Arc::new(ItemServiceImpl::new(InMemoryItemRepository::new()));

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
        storage.clone(),
        limiter,
    ));

    TestApp {
        user_service,
        item_service,
        thread_service,
        message_service,
        event_service,
        storage,
    }
}

impl TestApp {
    async fn register(&self, id: &str, name: &str) -> user::Id {
        let id = user::Id::from(id);
        self.user_service
            .save_profile(Profile::new(id.clone(), name, format!("/avatars/{name}.png")))
            .await
            .unwrap();
        id
    }

    async fn list_item(&self, seller: &user::Id, title: &str) -> item::Id {
        let item = self
            .item_service
            .create(
                seller,
                CreateItem {
                    title: title.to_string(),
                    description: String::new(),
                    category: "Mobilier".to_string(),
                    keywords: vec![],
                    price_cents: 4000,
                    image_url: None,
                },
            )
            .await
            .unwrap();
        item.id
    }

    fn request(&self, thread_id: &thread::Id, item_id: &item::Id, text: &str) -> SendMessage {
        SendMessage {
            thread_id: thread_id.clone(),
            item_id: item_id.clone(),
            text: text.to_string(),
            image_url: None,
            audio_url: None,
        }
    }
}

#[tokio::test]
async fn sending_updates_preview_unread_and_seen() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();

    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &lamp, "Hello"))
        .await
        .unwrap();

    let for_alice = app
        .thread_service
        .find_by_id(&dto.id, &alice)
        .await
        .unwrap();
    let last = for_alice.last_message.unwrap();
    assert_eq!(last.text, "Hello");
    assert_eq!(last.sender_id, bob);
    assert_eq!(for_alice.unread_item_ids, vec![lamp.clone()]);
    // only the sender has seen the new preview
    assert!(!for_alice.seen_latest);

    let for_bob = app.thread_service.find_by_id(&dto.id, &bob).await.unwrap();
    assert!(for_bob.seen_latest);
    assert!(for_bob.unread_item_ids.is_empty());
}

#[tokio::test]
async fn snapshot_follows_the_latest_discussed_item() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;
    let chair = app.list_item(&alice, "Chaise").await;

    let dto = app
        .thread_service
        .create_or_get(&bob, &alice, Some(&lamp))
        .await
        .unwrap();

    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &lamp, "La lampe ?"))
        .await
        .unwrap();
    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &chair, "Et la chaise ?"))
        .await
        .unwrap();

    let view = app.thread_service.find_by_id(&dto.id, &bob).await.unwrap();
    let snapshot = view.item.unwrap();
    assert_eq!(snapshot.item_id, chair);
    assert_eq!(snapshot.title, "Chaise");
    assert_eq!(snapshot.seller_id, alice);
    assert_eq!(view.discussed_item_ids, vec![lamp, chair]);
}

#[tokio::test]
async fn empty_message_without_attachment_is_rejected() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();

    let result = app
        .message_service
        .send(&bob, "Bob", app.request(&dto.id, &lamp, "   "))
        .await;

    assert!(matches!(result, Err(message::Error::Empty)));
}

#[tokio::test]
async fn attachments_allow_empty_text_and_set_markers() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();

    let mut request = app.request(&dto.id, &lamp, "");
    request.image_url = Some("mem://media/photo.jpg".to_string());
    app.message_service
        .send(&bob, "Bob", request)
        .await
        .unwrap();

    let view = app.thread_service.find_by_id(&dto.id, &bob).await.unwrap();
    assert_eq!(view.last_message.unwrap().text, PHOTO_PREVIEW);

    let mut request = app.request(&dto.id, &lamp, "");
    request.audio_url = Some("mem://media/note.ogg".to_string());
    app.message_service
        .send(&bob, "Bob", request)
        .await
        .unwrap();

    let view = app.thread_service.find_by_id(&dto.id, &bob).await.unwrap();
    assert_eq!(view.last_message.unwrap().text, VOICE_PREVIEW);
}

#[tokio::test]
async fn sending_to_a_missing_thread_fails() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let ghost = thread::Id::of(&alice, &user::Id::from("ghost"));
    let result = app
        .message_service
        .send(&bob, "Bob", app.request(&ghost, &lamp, "Hello"))
        .await;

    assert!(matches!(
        result,
        Err(message::Error::_Thread(thread::Error::NotFound(_)))
    ));
}

#[tokio::test]
async fn item_conversations_are_isolated() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;
    let chair = app.list_item(&alice, "Chaise").await;

    let dto = app
        .thread_service
        .create_or_get(&bob, &alice, Some(&lamp))
        .await
        .unwrap();

    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &lamp, "La lampe ?"))
        .await
        .unwrap();
    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &chair, "La chaise ?"))
        .await
        .unwrap();

    let lamp_messages = app
        .message_service
        .find_by_thread_and_item(&dto.id, &lamp, &alice)
        .await
        .unwrap();
    assert_eq!(lamp_messages.len(), 1);
    assert_eq!(lamp_messages[0].text, "La lampe ?");

    let chair_messages = app
        .message_service
        .find_by_thread_and_item(&dto.id, &chair, &alice)
        .await
        .unwrap();
    assert_eq!(chair_messages.len(), 1);
    assert_eq!(chair_messages[0].text, "La chaise ?");
}

#[tokio::test]
async fn read_receipts_grow_and_stay_idempotent() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();

    let sent = app
        .message_service
        .send(&bob, "Bob", app.request(&dto.id, &lamp, "Hello"))
        .await
        .unwrap();
    assert_eq!(sent.read_by, vec![bob.clone()]);

    app.message_service
        .mark_read(&dto.id, &sent.id, &alice)
        .await
        .unwrap();
    app.message_service
        .mark_read(&dto.id, &sent.id, &alice)
        .await
        .unwrap();

    let messages = app
        .message_service
        .find_by_thread_and_item(&dto.id, &lamp, &alice)
        .await
        .unwrap();
    let mut expected = vec![alice.clone(), bob.clone()];
    expected.sort();
    assert_eq!(messages[0].read_by, expected);
}

#[tokio::test]
async fn image_send_uploads_the_attachment() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();

    let sent = app
        .message_service
        .send_with_image(
            &bob,
            "Bob",
            app.request(&dto.id, &lamp, "Voilà"),
            Bytes::from_static(b"jpeg-bytes"),
        )
        .await
        .unwrap();

    let url = sent.image_url.unwrap();
    assert!(app.storage.get(&url).await.is_some());

    let view = app.thread_service.find_by_id(&dto.id, &bob).await.unwrap();
    assert_eq!(view.last_message.unwrap().text, format!("{PHOTO_PREVIEW} Voilà"));
}

#[tokio::test]
async fn failed_image_send_cleans_up_the_upload() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();
    app.thread_service.block(&dto.id, &alice).await.unwrap();

    let result = app
        .message_service
        .send_with_image(
            &bob,
            "Bob",
            app.request(&dto.id, &lamp, "Voilà"),
            Bytes::from_static(b"jpeg-bytes"),
        )
        .await;

    assert!(matches!(
        result,
        Err(message::Error::_Thread(thread::Error::Blocked))
    ));
    // the orphaned upload was deleted
    assert!(app.storage.is_empty().await);

    let messages = app
        .message_service
        .find_by_thread_and_item(&dto.id, &lamp, &bob)
        .await
        .unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn recipient_subscription_receives_new_message() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();

    let mut notifications = app
        .event_service
        .subscribe(&Subject::Threads(alice.clone()));

    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &lamp, "Hello"))
        .await
        .unwrap();

    match notifications.next().await {
        Some(Notification::NewMessage(message)) => {
            assert_eq!(message.text, "Hello");
            assert_eq!(message.sender_id, bob);
        }
        other => panic!("expected a new-message notification, got {other:?}"),
    }
}

#[tokio::test]
async fn item_conversation_subscription_is_scoped() {
    let app = setup();
    let alice = app.register("alice", "Alice").await;
    let bob = app.register("bob", "Bob").await;
    let lamp = app.list_item(&alice, "Lampe").await;
    let chair = app.list_item(&alice, "Chaise").await;

    let dto = app
        .thread_service
        .create_or_get(&alice, &bob, Some(&lamp))
        .await
        .unwrap();

    let mut lamp_stream = app
        .event_service
        .subscribe(&Subject::ItemConversation(dto.id.clone(), lamp.clone()));

    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &chair, "La chaise ?"))
        .await
        .unwrap();
    app.message_service
        .send(&bob, "Bob", app.request(&dto.id, &lamp, "La lampe ?"))
        .await
        .unwrap();

    match lamp_stream.next().await {
        Some(Notification::NewMessage(message)) => {
            assert_eq!(message.item_id, lamp);
            assert_eq!(message.text, "La lampe ?");
        }
        other => panic!("expected a new-message notification, got {other:?}"),
    }
}
