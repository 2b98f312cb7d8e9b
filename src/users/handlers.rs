use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::instrument;

use crate::{
    auth::{extractors::CurrentUser, jwt::JwtKeys},
    errors::AppResult,
    state::AppState,
    users::{
        dto::{DeleteUserResponse, ProfileResponse, UpdateProfileRequest},
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/api/users",
        get(get_me).put(update_me).delete(delete_me),
    )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(services::get_self(&state, user.id).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<ProfileResponse>> {
    let Json(payload) = payload?;
    Ok(Json(services::update_self(&state, user.id, payload).await?))
}

#[instrument(skip(state, user, jar), fields(user_id = %user.id))]
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<DeleteUserResponse>)> {
    let deleted = services::delete_self(&state, user.id).await?;
    let jar = jar.add(JwtKeys::from_ref(&state).removal_cookie());
    Ok((
        jar,
        Json(DeleteUserResponse {
            message: "user deleted successfully".into(),
            user_detail: deleted,
        }),
    ))
}
