use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, MessageResponse, PublicUser, SignupRequest},
        jwt::JwtKeys,
        services,
    },
    errors::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/admin-login", post(admin_login))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, CookieJar, Json<PublicUser>)> {
    let Json(payload) = payload?;
    let (user, token) = services::signup(&state, payload).await?;
    let jar = jar.add(JwtKeys::from_ref(&state).session_cookie(token));
    Ok((StatusCode::CREATED, jar, Json(user)))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let Json(payload) = payload?;
    let token = services::login(&state, payload).await?;
    let jar = jar.add(JwtKeys::from_ref(&state).session_cookie(token));
    Ok((jar, Json(MessageResponse::new("login successfully!"))))
}

/// Always succeeds, with or without a session.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(JwtKeys::from_ref(&state).removal_cookie());
    info!("session cookie cleared");
    (jar, Json(MessageResponse::new("You are logedout!")))
}

pub async fn admin_login() -> AppError {
    AppError::NotImplemented("admin login is not implemented".into())
}
