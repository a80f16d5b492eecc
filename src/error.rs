use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{debug, error};
use serde::Serialize;

use crate::{integration, item, message, ratelimit, recommend, thread, user};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Thread(#[from] thread::Error),
    #[error(transparent)]
    _Message(#[from] message::Error),
    #[error(transparent)]
    _User(#[from] user::Error),
    #[error(transparent)]
    _Item(#[from] item::Error),
    #[error(transparent)]
    _Recommend(#[from] recommend::Error),
    #[error(transparent)]
    _RateLimit(#[from] ratelimit::Error),
    #[error(transparent)]
    _Integration(#[from] integration::Error),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Self::_Thread(e) => e.into(),
            Self::_Message(e) => e.into(),
            Self::_User(e) => e.into(),
            Self::_Item(e) => e.into(),
            Self::_Recommend(e) => e.into(),
            Self::_RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::_Integration(e) => e.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::_Thread(e) => e.kind(),
            Self::_Message(e) => e.kind(),
            Self::_User(e) => e.kind(),
            Self::_Item(e) => e.kind(),
            Self::_Recommend(e) => e.kind(),
            Self::_RateLimit(_) => "rate_limited",
            Self::_Integration(e) => e.kind(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{self:?}");
        } else {
            debug!("{self}");
        }

        let body = ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
