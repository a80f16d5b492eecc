use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::Id;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Explicit caller identity. There is no ambient current-user state: every
/// operation takes the acting user id, and HTTP callers supply theirs in the
/// `x-user-id` header.
#[derive(Clone, Debug)]
pub struct Identity(pub Id);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = crate::Error;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| Self(Id::from(value)))
            .ok_or_else(|| super::Error::MissingIdentity.into())
    }
}
