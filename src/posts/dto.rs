use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::UserId;
use crate::posts::repo_types::{Post, PostAuthorRow, PostId};

#[derive(Debug, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Owner fields expanded into a post. `email` is left out of public
/// per-author listings.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub description: String,
    pub author: AuthorSummary,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PostView {
    pub fn with_email(row: PostAuthorRow) -> Self {
        Self::build(row, true)
    }

    pub fn without_email(row: PostAuthorRow) -> Self {
        Self::build(row, false)
    }

    fn build(row: PostAuthorRow, include_email: bool) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            author: AuthorSummary {
                id: row.author_id,
                username: row.author_username,
                email: include_email.then_some(row.author_email),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedPostResponse {
    pub message: Post,
}

#[derive(Debug, Serialize)]
pub struct PostMutationResponse {
    pub message: String,
    pub info: Post,
}
