use axum::http::StatusCode;

impl From<&super::Error> for StatusCode {
    fn from(e: &super::Error) -> Self {
        match e {
            super::Error::_Item(e) => e.into(),
        }
    }
}

pub(super) mod api {
    use axum::Json;
    use axum::extract::State;

    use crate::item::model::Item;
    use crate::recommend;
    use crate::recommend::service::RecommendService;
    use crate::user::identity::Identity;

    pub async fn find_for_user(
        Identity(logged_id): Identity,
        State(recommend_service): State<recommend::Service>,
    ) -> crate::Result<Json<Vec<Item>>> {
        let items = recommend_service.find_for_user(&logged_id).await?;

        Ok(Json(items))
    }
}
