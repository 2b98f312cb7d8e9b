//! In-memory store used by tests in place of Postgres. Mirrors the schema
//! rules: unique username/email and post cascade on user delete.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::repo::UserRepo;
use crate::auth::repo_types::{NewUser, Role, User, UserId};
use crate::errors::{AppError, AppResult};
use crate::posts::repo::PostRepo;
use crate::posts::repo_types::{NewPost, Post, PostAuthorRow, PostId};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    posts: Vec<Post>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }
}

impl Inner {
    fn check_unique(&self, username: &str, email: &str, exclude: Option<UserId>) -> AppResult<()> {
        for u in self.users.iter().filter(|u| Some(u.id) != exclude) {
            if u.username == username {
                return Err(AppError::conflict("this username is taken!"));
            }
            if u.email == email {
                return Err(AppError::conflict("this email is taken!"));
            }
        }
        Ok(())
    }

    fn joined(&self, post: &Post) -> Option<PostAuthorRow> {
        let author = self.users.iter().find(|u| u.id == post.author)?;
        Some(PostAuthorRow {
            id: post.id,
            title: post.title.clone(),
            description: post.description.clone(),
            author_id: author.id,
            author_username: author.username.clone(),
            author_email: author.email.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_conflicting(
        &self,
        username: &str,
        email: &str,
        exclude: UserId,
    ) -> AppResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|u| u.id != exclude && (u.username == username || u.email == email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_unique(&user.username, &user.email, None)?;
        let now = OffsetDateTime::now_utc();
        let created = User {
            id: UserId::new(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: Role::User,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: UserId,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_unique(username, email, Some(id))?;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.username = username.to_string();
        user.email = email.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> AppResult<Option<User>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(pos) = inner.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        let removed = inner.users.remove(pos);
        inner.posts.retain(|p| p.author != id);
        Ok(Some(removed))
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn list_all(&self) -> AppResult<Vec<PostAuthorRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.posts.iter().filter_map(|p| inner.joined(p)).collect())
    }

    async fn list_by_author(&self, author: UserId) -> AppResult<Vec<PostAuthorRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.author == author)
            .filter_map(|p| inner.joined(p))
            .collect())
    }

    async fn find_by_id(&self, id: PostId) -> AppResult<Option<Post>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_with_author(&self, id: PostId) -> AppResult<Option<PostAuthorRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| inner.joined(p)))
    }

    async fn create(&self, post: NewPost) -> AppResult<Post> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.iter().any(|u| u.id == post.author) {
            return Err(AppError::Internal(anyhow::anyhow!("author does not exist")));
        }
        let now = OffsetDateTime::now_utc();
        let created = Post {
            id: PostId::new(),
            title: post.title,
            description: post.description,
            author: post.author,
            created_at: now,
            updated_at: now,
        };
        inner.posts.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: PostId,
        title: &str,
        description: &str,
    ) -> AppResult<Option<Post>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(post) = inner.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.title = title.to_string();
        post.description = description.to_string();
        post.updated_at = OffsetDateTime::now_utc();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: PostId) -> AppResult<Option<Post>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(pos) = inner.posts.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.posts.remove(pos)))
    }
}
