use std::sync::Arc;

use marketplace_service::item::repository::InMemoryItemRepository;
use marketplace_service::item::service::{CreateItem, ItemService, ItemServiceImpl};
use marketplace_service::recommend::service::{RecommendService, RecommendServiceImpl};
use marketplace_service::recommend::MAX_RECOMMENDATIONS;
use marketplace_service::{item, recommend, user};

struct TestApp {
    item_service: item::Service,
    recommend_service: recommend::Service,
}

fn setup() -> TestApp {
    let item_service: item::Service = Arc::new(ItemServiceImpl::new(InMemoryItemRepository::new()));
    let recommend_service: recommend::Service =
        Arc::new(RecommendServiceImpl::new(item_service.clone()));

    TestApp {
        item_service,
        recommend_service,
    }
}

impl TestApp {
    async fn list_item(
        &self,
        seller: &user::Id,
        title: &str,
        category: &str,
        keywords: &[&str],
    ) -> item::Id {
        let item = self
            .item_service
            .create(
                seller,
                CreateItem {
                    title: title.to_string(),
                    description: String::new(),
                    category: category.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                    price_cents: 1500,
                    image_url: None,
                },
            )
            .await
            .unwrap();
        item.id
    }
}

#[tokio::test]
async fn no_history_means_no_recommendations() {
    let app = setup();
    let seller = user::Id::from("seller");
    let me = user::Id::from("me");

    app.list_item(&seller, "Radio", "Électronique", &[]).await;

    let items = app.recommend_service.find_for_user(&me).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn recommends_similar_unseen_items() {
    let app = setup();
    let seller = user::Id::from("seller");
    let me = user::Id::from("me");

    let viewed = app.list_item(&seller, "Radio", "Électronique", &[]).await;
    let similar = app
        .list_item(&seller, "Ampli", "Électronique", &[])
        .await;
    app.list_item(&seller, "Commode", "Mobilier", &[]).await;

    app.item_service.record_view(&me, &viewed).await.unwrap();

    let ids: Vec<_> = app
        .recommend_service
        .find_for_user(&me)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(ids, vec![similar]);
}

#[tokio::test]
async fn own_sold_and_viewed_items_are_excluded() {
    let app = setup();
    let seller = user::Id::from("seller");
    let me = user::Id::from("me");

    let viewed = app.list_item(&seller, "Radio", "Électronique", &[]).await;
    let mine = app.list_item(&me, "Ma radio", "Électronique", &[]).await;
    let sold = app.list_item(&seller, "Vendu", "Électronique", &[]).await;
    let open = app.list_item(&seller, "Ampli", "Électronique", &[]).await;

    app.item_service.mark_sold(&sold, &seller).await.unwrap();
    app.item_service.record_view(&me, &viewed).await.unwrap();

    let ids: Vec<_> = app
        .recommend_service
        .find_for_user(&me)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(ids, vec![open]);
    assert!(!ids.contains(&mine));
}

#[tokio::test]
async fn results_are_capped() {
    let app = setup();
    let seller = user::Id::from("seller");
    let me = user::Id::from("me");

    let viewed = app.list_item(&seller, "Radio", "Électronique", &[]).await;
    app.item_service.record_view(&me, &viewed).await.unwrap();

    for i in 0..(MAX_RECOMMENDATIONS + 5) {
        app.list_item(&seller, &format!("Objet {i}"), "Électronique", &[])
            .await;
    }

    let items = app.recommend_service.find_for_user(&me).await.unwrap();
    assert_eq!(items.len(), MAX_RECOMMENDATIONS);
}

#[tokio::test]
async fn keyword_overlap_counts_toward_similarity() {
    let app = setup();
    let seller = user::Id::from("seller");
    let me = user::Id::from("me");

    let viewed = app
        .list_item(&seller, "Radio", "Électronique", &["vintage", "bois"])
        .await;
    let strong = app
        .list_item(&seller, "Tourne-disque", "Électronique", &["vintage"])
        .await;
    let weak = app
        .list_item(&seller, "Étagère", "Mobilier", &["bois"])
        .await;

    app.item_service.record_view(&me, &viewed).await.unwrap();

    let ids: Vec<_> = app
        .recommend_service
        .find_for_user(&me)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(ids, vec![strong, weak]);
}
