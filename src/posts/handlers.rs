use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser,
    errors::AppResult,
    posts::{
        dto::{CreatedPostResponse, PostInput, PostMutationResponse, PostView},
        services,
    },
    state::AppState,
};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/user/:id", get(list_author_posts))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<PostView>>> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PostView>> {
    Ok(Json(services::get(&state, &id).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id, username = %user.username))]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedPostResponse>)> {
    let Json(payload) = payload?;
    let post = services::create(&state, user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedPostResponse { message: post })))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> AppResult<Json<PostMutationResponse>> {
    let Json(payload) = payload?;
    let post = services::update(&state, user.id, &id, payload).await?;
    Ok(Json(PostMutationResponse {
        message: "updated successfully".into(),
        info: post,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostMutationResponse>> {
    let post = services::delete(&state, user.id, &id).await?;
    Ok(Json(PostMutationResponse {
        message: "deleted!".into(),
        info: post,
    }))
}

#[instrument(skip(state))]
pub async fn list_author_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<PostView>>> {
    Ok(Json(services::list_by_author(&state, &id).await?))
}
