//! Tests for the authentication handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::Utc;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{InMemoryBackend, in_memory_backend, test_session_middleware};
use crate::inbound::http::users;
use crate::test_support::SteppingClock;

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "secret1";

fn backend() -> InMemoryBackend {
    in_memory_backend(Arc::new(SteppingClock::frozen(Utc::now())), None)
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .configure(configure)
                .configure(users::configure),
        )
}

fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    actix_test::call_service(
        app,
        actix_test::TestRequest::post().uri(uri).set_json(body).to_request(),
    )
    .await
}

async fn signup<S>(app: &S) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    post_json(
        app,
        "/api/v1/auth/signup",
        json!({"username": "alice_01", "email": EMAIL, "password": PASSWORD}),
    )
    .await
}

async fn confirm<S>(app: &S, backend: &InMemoryBackend) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let token = backend.notifier.token_for(EMAIL).expect("confirmation sent");
    actix_test::call_service(
        app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/auth/confirmed_email/{EMAIL}/{token}"))
            .to_request(),
    )
    .await
}

async fn login<S>(app: &S) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    post_json(
        app,
        "/api/v1/auth/login",
        json!({"email": EMAIL, "password": PASSWORD}),
    )
    .await
}

#[actix_web::test]
async fn signup_creates_unconfirmed_account() {
    let backend = backend();
    let app = actix_test::init_service(test_app(backend.state.clone())).await;

    let response = signup(&app).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: UserResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.email, EMAIL);
    assert!(!body.confirmed);
    assert_eq!(body.avatar.as_deref(), Some("https://avatars.test/default"));
    assert_eq!(backend.notifier.sent().len(), 1);
}

#[actix_web::test]
async fn duplicate_signup_conflicts() {
    let app = actix_test::init_service(test_app(backend().state)).await;
    signup(&app).await;

    let response = signup(&app).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case(json!({"username": "al", "email": EMAIL, "password": PASSWORD}), "username")]
#[case(json!({"username": "alice_01", "email": "nope", "password": PASSWORD}), "email")]
#[case(json!({"username": "alice_01", "email": EMAIL, "password": "123"}), "password")]
#[actix_web::test]
async fn signup_validation_names_the_field(#[case] payload: Value, #[case] field: &str) {
    let app = actix_test::init_service(test_app(backend().state)).await;

    let response = post_json(&app, "/api/v1/auth/signup", payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn login_requires_confirmation() {
    let app = actix_test::init_service(test_app(backend().state)).await;
    signup(&app).await;

    let response = login(&app).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "email not confirmed");
}

#[actix_web::test]
async fn confirmation_then_login_sets_session() {
    let backend = backend();
    let app = actix_test::init_service(test_app(backend.state.clone())).await;
    signup(&app).await;

    let confirmed = confirm(&app, &backend).await;
    assert_eq!(confirmed.status(), StatusCode::OK);
    let body: MessageResponse = actix_test::read_body_json(confirmed).await;
    assert_eq!(body.message, "Email confirmed");

    let again = confirm(&app, &backend).await;
    let body: MessageResponse = actix_test::read_body_json(again).await;
    assert_eq!(body.message, "Your email is already confirmed");

    let response = login(&app).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("session cookie");
    let session: SessionResponse = actix_test::read_body_json(response).await;
    assert!(!session.refresh_token.is_empty());
    assert!(session.user.confirmed);

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[actix_web::test]
async fn forged_confirmation_token_is_rejected() {
    let app = actix_test::init_service(test_app(backend().state)).await;
    signup(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/auth/confirmed_email/{EMAIL}/forged"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "verification error");
}

#[actix_web::test]
async fn refresh_rotates_and_rejects_replay() {
    let backend = backend();
    let app = actix_test::init_service(test_app(backend.state.clone())).await;
    signup(&app).await;
    confirm(&app, &backend).await;
    let first: SessionResponse = actix_test::read_body_json(login(&app).await).await;

    let rotated = post_json(
        &app,
        "/api/v1/auth/refresh_token",
        json!({"refreshToken": first.refresh_token}),
    )
    .await;
    assert_eq!(rotated.status(), StatusCode::OK);
    assert!(session_cookie(&rotated).is_some());
    let second: SessionResponse = actix_test::read_body_json(rotated).await;
    assert_ne!(second.refresh_token, first.refresh_token);

    let replay = post_json(
        &app,
        "/api/v1/auth/refresh_token",
        json!({"refreshToken": first.refresh_token}),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    let current = post_json(
        &app,
        "/api/v1/auth/refresh_token",
        json!({"refreshToken": second.refresh_token}),
    )
    .await;
    assert_eq!(current.status(), StatusCode::OK);
}

#[actix_web::test]
async fn forged_refresh_token_keeps_victim_session_alive() {
    let backend = backend();
    let app = actix_test::init_service(test_app(backend.state.clone())).await;
    signup(&app).await;
    confirm(&app, &backend).await;
    let issued: SessionResponse = actix_test::read_body_json(login(&app).await).await;
    let victim_id = issued.user.id;

    let forged = post_json(
        &app,
        "/api/v1/auth/refresh_token",
        json!({"refreshToken": format!("{victim_id}.{}", "0".repeat(64))}),
    )
    .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    assert!(backend.users.snapshot()[0].refresh_token_digest.is_some());

    let legitimate = post_json(
        &app,
        "/api/v1/auth/refresh_token",
        json!({"refreshToken": issued.refresh_token}),
    )
    .await;
    assert_eq!(legitimate.status(), StatusCode::OK);
}

#[rstest]
#[case("")]
#[case("not-a-token")]
#[actix_web::test]
async fn malformed_refresh_token_is_unauthorised(#[case] token: &str) {
    let app = actix_test::init_service(test_app(backend().state)).await;

    let response = post_json(
        &app,
        "/api/v1/auth/refresh_token",
        json!({"refreshToken": token}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_clears_token_and_session() {
    let backend = backend();
    let app = actix_test::init_service(test_app(backend.state.clone())).await;
    signup(&app).await;
    confirm(&app, &backend).await;
    let response = login(&app).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let logout_response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(logout_response.status(), StatusCode::NO_CONTENT);
    let removal = session_cookie(&logout_response).expect("removal cookie");
    assert_eq!(removal.value(), "");
    let stored = backend.users.snapshot();
    assert_eq!(stored[0].refresh_token_digest, None);
}

#[actix_web::test]
async fn logout_without_session_is_unauthorised() {
    let app = actix_test::init_service(test_app(backend().state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/auth/logout").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
