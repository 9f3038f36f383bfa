//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with its request and response schemas, plus the session cookie security
//! scheme. Debug builds serve it through Swagger UI at `/docs`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{
    LoginRequest, MessageResponse, RefreshRequest, SessionResponse, SignupRequest,
};
use crate::inbound::http::contacts::{ContactRequest, ContactResponse, ContactUpdateRequest};
use crate::inbound::http::users::UserResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Contacts backend API",
        description = "Per-user address book with session-authenticated access and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::refresh_token,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::confirm_email,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_avatar,
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::upcoming_birthdays,
        crate::inbound::http::contacts::search_by_last_name,
        crate::inbound::http::contacts::search_by_first_name,
        crate::inbound::http::contacts::search_by_email,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::remove_contact,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignupRequest,
        LoginRequest,
        RefreshRequest,
        SessionResponse,
        MessageResponse,
        UserResponse,
        ContactRequest,
        ContactUpdateRequest,
        ContactResponse,
    )),
    tags(
        (name = "auth", description = "Signup, login, token rotation and email confirmation"),
        (name = "users", description = "The authenticated account"),
        (name = "contacts", description = "The authenticated user's address book"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
