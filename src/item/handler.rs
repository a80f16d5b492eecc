use axum::http::StatusCode;

impl From<&super::Error> for StatusCode {
    fn from(e: &super::Error) -> Self {
        match e {
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::NotSeller(_) => Self::FORBIDDEN,
            super::Error::_Integration(e) => e.into(),
        }
    }
}

pub(super) mod api {
    use axum::Json;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;

    use crate::item;
    use crate::item::model::Item;
    use crate::item::service::CreateItem;
    use crate::user::identity::Identity;

    pub async fn create(
        Identity(logged_id): Identity,
        State(item_service): State<item::Service>,
        Json(params): Json<CreateItem>,
    ) -> crate::Result<Json<Item>> {
        let item = item_service.create(&logged_id, params).await?;

        Ok(Json(item))
    }

    pub async fn find_one(
        State(item_service): State<item::Service>,
        Path(id): Path<item::Id>,
    ) -> crate::Result<Json<Item>> {
        let item = item_service.find(&id).await?;

        Ok(Json(item))
    }

    pub async fn record_view(
        Identity(logged_id): Identity,
        State(item_service): State<item::Service>,
        Path(id): Path<item::Id>,
    ) -> crate::Result<StatusCode> {
        item_service.record_view(&logged_id, &id).await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn mark_sold(
        Identity(logged_id): Identity,
        State(item_service): State<item::Service>,
        Path(id): Path<item::Id>,
    ) -> crate::Result<StatusCode> {
        item_service.mark_sold(&id, &logged_id).await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
