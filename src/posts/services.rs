use tracing::{info, warn};

use crate::{
    auth::{repo_types::UserId, services::present},
    errors::{AppError, AppResult},
    posts::{
        dto::{PostInput, PostView},
        repo_types::{NewPost, Post, PostId},
    },
    state::AppState,
};

/// Ownership guard: only the recorded author may mutate a post.
pub(crate) fn ensure_owner(post: &Post, caller: UserId, action: &str) -> AppResult<()> {
    if post.author != caller {
        warn!(post_id = %post.id, owner = %post.author, caller = %caller, action, "not the owner");
        return Err(AppError::forbidden(format!(
            "You can only {action} your own posts"
        )));
    }
    Ok(())
}

fn required_fields(input: PostInput) -> AppResult<(String, String)> {
    match (present(input.title), present(input.description)) {
        (Some(title), Some(description)) => Ok((title, description)),
        _ => Err(AppError::validation("title and description cant be empty")),
    }
}

/// Loads the post and checks ownership before anything is written.
async fn owned_post(st: &AppState, caller: UserId, id: PostId, action: &str) -> AppResult<Post> {
    let post = st
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;
    ensure_owner(&post, caller, action)?;
    Ok(post)
}

pub async fn list(st: &AppState) -> AppResult<Vec<PostView>> {
    let rows = st.posts.list_all().await?;
    Ok(rows.into_iter().map(PostView::with_email).collect())
}

pub async fn get(st: &AppState, raw_id: &str) -> AppResult<PostView> {
    let id = PostId::parse(raw_id)?;
    let row = st
        .posts
        .find_with_author(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;
    Ok(PostView::with_email(row))
}

pub async fn create(st: &AppState, caller: UserId, input: PostInput) -> AppResult<Post> {
    let (title, description) = required_fields(input)?;
    let post = st
        .posts
        .create(NewPost {
            author: caller,
            title,
            description,
        })
        .await?;
    info!(post_id = %post.id, author = %caller, "post created");
    Ok(post)
}

pub async fn update(
    st: &AppState,
    caller: UserId,
    raw_id: &str,
    input: PostInput,
) -> AppResult<Post> {
    let id = PostId::parse(raw_id)?;
    let (title, description) = required_fields(input)?;
    owned_post(st, caller, id, "edit").await?;
    let post = st
        .posts
        .update(id, &title, &description)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;
    info!(post_id = %id, "post updated");
    Ok(post)
}

pub async fn delete(st: &AppState, caller: UserId, raw_id: &str) -> AppResult<Post> {
    let id = PostId::parse(raw_id)?;
    owned_post(st, caller, id, "delete").await?;
    let post = st
        .posts
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;
    info!(post_id = %id, "post deleted");
    Ok(post)
}

pub async fn list_by_author(st: &AppState, raw_author: &str) -> AppResult<Vec<PostView>> {
    let author = UserId::parse(raw_author)?;
    let rows = st.posts.list_by_author(author).await?;
    Ok(rows.into_iter().map(PostView::without_email).collect())
}
