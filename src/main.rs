use log::info;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use marketplace_service::integration::Config;
use marketplace_service::state::AppState;
use marketplace_service::{event, item, message, recommend, thread, user};

#[tokio::main]
async fn main() {
    let config = Config::default();
    let state = AppState::init(&config);

    let cors = CorsLayer::new()
        .allow_origin(config.env.allow_origin())
        .allow_methods(config.env.allow_methods())
        .allow_headers(config.env.allow_headers());

    let app = axum::Router::new()
        .merge(thread::api(state.clone()))
        .merge(message::api(state.clone()))
        .merge(recommend::api(state.clone()))
        .merge(item::api(state.clone()))
        .merge(user::api(state.clone()))
        .merge(event::endpoints(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let addr = config.env.addr();
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server failed");
}
