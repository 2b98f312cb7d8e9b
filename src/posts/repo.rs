use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::UserId;
use crate::errors::AppResult;
use crate::posts::repo_types::{NewPost, Post, PostAuthorRow, PostId};

/// Persistence seam for posts. Every mutation targets one row by id.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn list_all(&self) -> AppResult<Vec<PostAuthorRow>>;
    async fn list_by_author(&self, author: UserId) -> AppResult<Vec<PostAuthorRow>>;
    async fn find_by_id(&self, id: PostId) -> AppResult<Option<Post>>;
    async fn find_with_author(&self, id: PostId) -> AppResult<Option<PostAuthorRow>>;
    async fn create(&self, post: NewPost) -> AppResult<Post>;
    async fn update(&self, id: PostId, title: &str, description: &str)
        -> AppResult<Option<Post>>;
    async fn delete(&self, id: PostId) -> AppResult<Option<Post>>;
}

#[derive(Clone)]
pub struct PgPostRepo {
    db: PgPool,
}

impl PgPostRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const POST_COLUMNS: &str = "id, title, description, author, created_at, updated_at";

const JOINED_SELECT: &str = r#"
    SELECT p.id, p.title, p.description,
           u.id AS author_id, u.username AS author_username, u.email AS author_email,
           p.created_at, p.updated_at
      FROM posts p
      JOIN users u ON u.id = p.author
"#;

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn list_all(&self) -> AppResult<Vec<PostAuthorRow>> {
        let rows = sqlx::query_as::<_, PostAuthorRow>(&format!(
            "{JOINED_SELECT} ORDER BY p.created_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_by_author(&self, author: UserId) -> AppResult<Vec<PostAuthorRow>> {
        let rows = sqlx::query_as::<_, PostAuthorRow>(&format!(
            "{JOINED_SELECT} WHERE p.author = $1 ORDER BY p.created_at ASC"
        ))
        .bind(author)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: PostId) -> AppResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(post)
    }

    async fn find_with_author(&self, id: PostId) -> AppResult<Option<PostAuthorRow>> {
        let row = sqlx::query_as::<_, PostAuthorRow>(&format!("{JOINED_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn create(&self, post: NewPost) -> AppResult<Post> {
        let created = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, title, description, author)
            VALUES ($1, $2, $3, $4)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(PostId::new())
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.author)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: PostId,
        title: &str,
        description: &str,
    ) -> AppResult<Option<Post>> {
        let updated = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
               SET title = $2, description = $3, updated_at = now()
             WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.db)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: PostId) -> AppResult<Option<Post>> {
        let deleted = sqlx::query_as::<_, Post>(&format!(
            "DELETE FROM posts WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(deleted)
    }
}
