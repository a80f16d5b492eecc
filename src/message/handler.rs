use axum::http::StatusCode;

impl From<&super::Error> for StatusCode {
    fn from(e: &super::Error) -> Self {
        match e {
            super::Error::Empty => Self::BAD_REQUEST,
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::_Thread(e) => e.into(),
            super::Error::_Item(e) => e.into(),
            super::Error::_RateLimit(_) => Self::TOO_MANY_REQUESTS,
            super::Error::_Integration(e) => e.into(),
        }
    }
}

pub(super) mod api {
    use axum::Json;
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use bytes::Bytes;
    use serde::Deserialize;

    use crate::message::model::{MessageDto, SendMessage};
    use crate::user::identity::Identity;
    use crate::user::service::UserService;
    use crate::{item, message, thread, user};

    pub async fn create(
        Identity(logged_id): Identity,
        State(message_service): State<message::Service>,
        State(user_service): State<user::Service>,
        Json(request): Json<SendMessage>,
    ) -> crate::Result<Json<MessageDto>> {
        let profile = user_service.find_profile(&logged_id).await?;

        let dto = message_service
            .send(&logged_id, &profile.name, request)
            .await?;

        Ok(Json(dto))
    }

    #[derive(Deserialize)]
    pub struct ImageParams {
        pub thread_id: thread::Id,
        pub item_id: item::Id,
        #[serde(default)]
        pub text: String,
    }

    pub async fn create_with_image(
        Identity(logged_id): Identity,
        State(message_service): State<message::Service>,
        State(user_service): State<user::Service>,
        Query(params): Query<ImageParams>,
        body: Bytes,
    ) -> crate::Result<Json<MessageDto>> {
        let profile = user_service.find_profile(&logged_id).await?;

        let request = SendMessage {
            thread_id: params.thread_id,
            item_id: params.item_id,
            text: params.text,
            image_url: None,
            audio_url: None,
        };

        let dto = message_service
            .send_with_image(&logged_id, &profile.name, request, body)
            .await?;

        Ok(Json(dto))
    }

    #[derive(Deserialize)]
    pub struct FindParams {
        pub thread_id: thread::Id,
        pub item_id: item::Id,
    }

    pub async fn find_all(
        Identity(logged_id): Identity,
        State(message_service): State<message::Service>,
        Query(params): Query<FindParams>,
    ) -> crate::Result<Json<Vec<MessageDto>>> {
        let messages = message_service
            .find_by_thread_and_item(&params.thread_id, &params.item_id, &logged_id)
            .await?;

        Ok(Json(messages))
    }

    #[derive(Deserialize)]
    pub struct ThreadParams {
        pub thread_id: thread::Id,
    }

    pub async fn mark_read(
        Identity(logged_id): Identity,
        State(message_service): State<message::Service>,
        Path(id): Path<message::Id>,
        Query(params): Query<ThreadParams>,
    ) -> crate::Result<StatusCode> {
        message_service
            .mark_read(&params.thread_id, &id, &logged_id)
            .await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
