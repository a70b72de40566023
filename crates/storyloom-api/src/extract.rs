//! Request identity.
//!
//! Authentication happens upstream; the gateway forwards the user as
//! `x-user-id` (UUID) and, optionally, `x-user-role` (`author` | `admin`).

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use storyloom_core::access::{Actor, Role};
use tracing::debug;
use uuid::Uuid;

use crate::error::ErrorBody;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The actor a request runs for.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Actor);

/// Rejection for requests without a usable identity.
#[derive(Debug)]
pub struct Unauthenticated(&'static str);

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: "unauthorized",
            message: self.0.to_string(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or(Unauthenticated("missing x-user-id header"))?
            .parse::<Uuid>()
            .map_err(|_| Unauthenticated("x-user-id must be a UUID"))?;
        let role = match header(parts, USER_ROLE_HEADER) {
            None => Role::default(),
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|_| Unauthenticated("x-user-role must be author or admin"))?,
        };

        debug!(%user_id, %role, "request identity");
        Ok(Self(Actor { user_id, role }))
    }
}
