//! Caller identity forwarded by the authenticating gateway.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::error::ApiError;
use crate::domain::{Role, Viewer};

pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|v| !v.is_empty());
        let email = header(USER_EMAIL_HEADER).ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
        let role = header(USER_ROLE_HEADER).map_or(Role::Member, Role::parse);
        Ok(Viewer { role, email: email.to_string() })
    }
}
