use axum::http::StatusCode;

impl From<&super::Error> for StatusCode {
    fn from(e: &super::Error) -> Self {
        match e {
            super::Error::InvalidParticipants => Self::BAD_REQUEST,
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::Blocked => Self::CONFLICT,
            super::Error::NotParticipant => Self::FORBIDDEN,
            super::Error::_User(e) => e.into(),
            super::Error::_Item(e) => e.into(),
            super::Error::_RateLimit(_) => Self::TOO_MANY_REQUESTS,
            super::Error::_Integration(e) => e.into(),
        }
    }
}

pub(super) mod api {
    use axum::Json;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use serde::Deserialize;

    use crate::thread::{self, model::ThreadDto};
    use crate::user::identity::Identity;
    use crate::{item, user};

    #[derive(Deserialize)]
    pub struct CreateParams {
        pub recipient_id: user::Id,
        #[serde(default)]
        pub item_id: Option<item::Id>,
    }

    pub async fn create_or_get(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Json(params): Json<CreateParams>,
    ) -> crate::Result<Json<ThreadDto>> {
        let dto = thread_service
            .create_or_get(&logged_id, &params.recipient_id, params.item_id.as_ref())
            .await?;

        Ok(Json(dto))
    }

    pub async fn find_all(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
    ) -> crate::Result<Json<Vec<ThreadDto>>> {
        let threads = thread_service.find_all(&logged_id).await?;

        Ok(Json(threads))
    }

    pub async fn find_one(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Path(id): Path<thread::Id>,
    ) -> crate::Result<Json<ThreadDto>> {
        let dto = thread_service.find_by_id(&id, &logged_id).await?;

        Ok(Json(dto))
    }

    pub async fn delete(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Path(id): Path<thread::Id>,
    ) -> crate::Result<StatusCode> {
        thread_service.delete_for(&id, &logged_id).await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn mark_seen(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Path(id): Path<thread::Id>,
    ) -> crate::Result<StatusCode> {
        thread_service.mark_seen(&id, &logged_id).await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn mark_item_read(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Path((id, item_id)): Path<(thread::Id, item::Id)>,
    ) -> crate::Result<StatusCode> {
        thread_service
            .mark_item_read(&id, &item_id, &logged_id)
            .await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn delete_item_conversation(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Path((id, item_id)): Path<(thread::Id, item::Id)>,
    ) -> crate::Result<StatusCode> {
        thread_service
            .delete_item_conversation(&id, &item_id, &logged_id)
            .await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn block(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Path(id): Path<thread::Id>,
    ) -> crate::Result<StatusCode> {
        thread_service.block(&id, &logged_id).await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn unblock(
        Identity(logged_id): Identity,
        State(thread_service): State<thread::Service>,
        Path(id): Path<thread::Id>,
    ) -> crate::Result<StatusCode> {
        thread_service.unblock(&id, &logged_id).await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
