use axum::http::StatusCode;

impl From<&super::Error> for StatusCode {
    fn from(e: &super::Error) -> Self {
        match e {
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::MissingIdentity => Self::UNAUTHORIZED,
            super::Error::_Integration(e) => e.into(),
        }
    }
}

pub(super) mod api {
    use axum::Json;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use serde::Deserialize;

    use crate::user;
    use crate::user::identity::Identity;
    use crate::user::model::Profile;

    #[derive(Deserialize)]
    pub struct UpsertParams {
        pub name: String,
        #[serde(default)]
        pub avatar_url: String,
    }

    pub async fn upsert(
        Identity(logged_id): Identity,
        State(user_service): State<user::Service>,
        Json(params): Json<UpsertParams>,
    ) -> crate::Result<StatusCode> {
        let profile = Profile::new(logged_id, params.name, params.avatar_url);
        user_service.save_profile(profile).await?;

        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn find_one(
        State(user_service): State<user::Service>,
        Path(id): Path<user::Id>,
    ) -> crate::Result<Json<Profile>> {
        let profile = user_service.find_profile(&id).await?;

        Ok(Json(profile))
    }
}
