//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/signup        {"username":"alice_01","email":"a@x.com","password":"secret1"}
//! POST /api/v1/auth/login         {"email":"a@x.com","password":"secret1"}
//! POST /api/v1/auth/refresh_token {"refreshToken":"1.9f8e..."}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/confirmed_email/{email}/{token}
//! ```
//!
//! Login and refresh both establish the cookie session; the refresh token in
//! the body is the only credential a client keeps across session expiry.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ConfirmationOutcome, EmailConfirmation, IssuedSession};
use crate::domain::{ConfirmationToken, Error, LoginCredentials, RefreshToken, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{FieldName, credentials_validation_error, parse_email};

/// Signup request body for `POST /api/v1/auth/signup`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<SignupRequest> for Registration {
    type Error = Error;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
            .map_err(credentials_validation_error)
    }
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(credentials_validation_error)
    }
}

/// Request body for `POST /api/v1/auth/refresh_token`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Issued refresh token plus the authenticated user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub refresh_token: String,
    pub user: UserResponse,
}

impl From<IssuedSession> for SessionResponse {
    fn from(value: IssuedSession) -> Self {
        Self {
            refresh_token: value.refresh_token.as_str().to_owned(),
            user: value.user.into(),
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created; confirmation pending", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Account already exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate with email and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials or unconfirmed email", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let issued = state.accounts.login(credentials).await?;
    session.persist_user(&issued.user.id)?;
    Ok(web::Json(issued.into()))
}

/// Exchange a refresh token for a new one and reset the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh_token",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token rotated", body = SessionResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid refresh token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/auth/refresh_token")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let token = RefreshToken::parse(&payload.refresh_token)
        .map_err(|_| Error::unauthorized("invalid refresh token"))?;
    let issued = match state.accounts.refresh(token).await {
        Ok(issued) => issued,
        Err(error) => {
            session.purge();
            return Err(error);
        }
    };
    session.persist_user(&issued.user.id)?;
    Ok(web::Json(issued.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.accounts.logout(&user_id).await?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Confirm ownership of an email address with the token sent at signup.
#[utoipa::path(
    get,
    path = "/api/v1/auth/confirmed_email/{email}/{token}",
    params(
        ("email" = String, Path, description = "Account email"),
        ("token" = String, Path, description = "Confirmation token")
    ),
    responses(
        (status = 200, description = "Email confirmed", body = MessageResponse),
        (status = 400, description = "Verification error", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["auth"],
    operation_id = "confirmEmail",
    security([])
)]
#[get("/auth/confirmed_email/{email}/{token}")]
pub async fn confirm_email(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (email, token) = path.into_inner();
    let email = parse_email(&email, FieldName::new("email"))?;
    let outcome = state
        .accounts
        .confirm_email(EmailConfirmation {
            email,
            token: ConfirmationToken::from_raw(&token),
        })
        .await?;
    let message = match outcome {
        ConfirmationOutcome::Confirmed => "Email confirmed",
        ConfirmationOutcome::AlreadyConfirmed => "Your email is already confirmed",
    };
    Ok(web::Json(MessageResponse {
        message: message.to_owned(),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(refresh_token)
        .service(logout)
        .service(confirm_email);
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
