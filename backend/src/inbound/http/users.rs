//! Users API handlers.
//!
//! ```text
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/avatar   (raw image body, Content-Type: image/*)
//! ```

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AvatarUpload;
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Public projection of an account. Secrets and token digests stay behind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub confirmed: bool,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.as_i32(),
            username: value.username,
            email: value.email.into(),
            avatar: value.avatar,
            confirmed: value.confirmed,
        }
    }
}

/// Return the authenticated user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.users.current_user(&user_id).await?;
    Ok(web::Json(user.into()))
}

/// Replace the authenticated user's avatar with the request body.
#[utoipa::path(
    patch,
    path = "/api/v1/users/avatar",
    request_body(content = Vec<u8>, content_type = "image/*", description = "Raw image bytes"),
    responses(
        (status = 200, description = "Avatar updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Image host unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateAvatar"
)]
#[patch("/users/avatar")]
pub async fn update_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| missing_field_error(FieldName::new("Content-Type")))?;
    let upload = AvatarUpload {
        content_type,
        bytes: body.to_vec(),
    };
    let user = state.accounts.update_avatar(&user_id, upload).await?;
    Ok(web::Json(user.into()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(current_user).service(update_avatar);
}
