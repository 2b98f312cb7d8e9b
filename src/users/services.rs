use tracing::{info, warn};

use crate::{
    auth::{
        repo_types::UserId,
        services::{is_valid_email, normalize_email, present},
    },
    errors::{AppError, AppResult},
    state::AppState,
    users::dto::{DeletedUser, ProfileResponse, UpdateProfileRequest},
};

pub async fn get_self(st: &AppState, caller: UserId) -> AppResult<ProfileResponse> {
    let user = st
        .users
        .find_by_id(caller)
        .await?
        .ok_or_else(|| AppError::not_found("this user ID is not found!"))?;
    Ok(user.into())
}

pub async fn update_self(
    st: &AppState,
    caller: UserId,
    req: UpdateProfileRequest,
) -> AppResult<ProfileResponse> {
    let (Some(username), Some(email)) = (present(req.username), present(req.email)) else {
        return Err(AppError::validation("username and email are required!"));
    };
    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("invalid email! plz review"));
    }

    if let Some(other) = st.users.find_conflicting(&username, &email, caller).await? {
        warn!(user_id = %caller, other_id = %other.id, "profile update collides");
        if other.username == username {
            return Err(AppError::conflict("this username is taken!"));
        }
        return Err(AppError::conflict("this email is taken!"));
    }

    let updated = st
        .users
        .update_profile(caller, &username, &email)
        .await?
        .ok_or_else(|| AppError::not_found("this user ID is not found!"))?;
    info!(user_id = %caller, "profile updated");
    Ok(updated.into())
}

/// Deletes the caller's account; the handler clears the session cookie.
pub async fn delete_self(st: &AppState, caller: UserId) -> AppResult<DeletedUser> {
    let deleted = st
        .users
        .delete(caller)
        .await?
        .ok_or_else(|| AppError::not_found("user ID not found!"))?;
    info!(user_id = %deleted.id, username = %deleted.username, "user deleted");
    Ok(DeletedUser {
        id: deleted.id,
        username: deleted.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{dto::SignupRequest, services::signup};

    async fn register(st: &AppState, username: &str, email: &str) -> UserId {
        let (user, _) = signup(
            st,
            SignupRequest {
                username: Some(username.into()),
                email: Some(email.into()),
                password: Some("password1".into()),
            },
        )
        .await
        .unwrap();
        user.id
    }

    fn update(username: &str, email: &str) -> UpdateProfileRequest {
        UpdateProfileRequest {
            username: Some(username.into()),
            email: Some(email.into()),
        }
    }

    #[tokio::test]
    async fn get_self_returns_projection() {
        let st = AppState::fake();
        let id = register(&st, "neo", "neo@matrix.io").await;
        let me = get_self(&st, id).await.unwrap();
        assert_eq!(me.username, "neo");
        let json = serde_json::to_value(&me).unwrap();
        assert!(json.get("role").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn update_self_keeps_own_values_and_changes_others() {
        let st = AppState::fake();
        let id = register(&st, "neo", "neo@matrix.io").await;

        // Re-submitting your own username is not a collision.
        let same = update_self(&st, id, update("neo", "neo@matrix.io")).await.unwrap();
        assert_eq!(same.username, "neo");

        let changed = update_self(&st, id, update("the-one", "ONE@matrix.io"))
            .await
            .unwrap();
        assert_eq!(changed.username, "the-one");
        assert_eq!(changed.email, "one@matrix.io");
    }

    #[tokio::test]
    async fn update_self_conflicts_with_other_user() {
        let st = AppState::fake();
        let neo = register(&st, "neo", "neo@matrix.io").await;
        register(&st, "trinity", "trinity@matrix.io").await;

        let err = update_self(&st, neo, update("trinity", "neo@matrix.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m.contains("username")));

        let err = update_self(&st, neo, update("neo", "trinity@matrix.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m.contains("email")));

        assert_eq!(get_self(&st, neo).await.unwrap().username, "neo");
    }

    #[tokio::test]
    async fn update_self_rejects_blank_fields() {
        let st = AppState::fake();
        let id = register(&st, "neo", "neo@matrix.io").await;
        let err = update_self(&st, id, update("", "neo@matrix.io")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_self_then_gone() {
        let st = AppState::fake();
        let id = register(&st, "neo", "neo@matrix.io").await;
        let deleted = delete_self(&st, id).await.unwrap();
        assert_eq!(deleted.username, "neo");
        assert!(matches!(get_self(&st, id).await.unwrap_err(), AppError::NotFound(_)));
        assert!(matches!(delete_self(&st, id).await.unwrap_err(), AppError::NotFound(_)));
    }
}
