use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SignupRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::NewUser,
    },
    errors::{AppError, AppResult},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Creates the account and returns its public projection with a fresh token.
pub async fn signup(st: &AppState, req: SignupRequest) -> AppResult<(PublicUser, String)> {
    let (Some(username), Some(email), Some(password)) = (
        present(req.username),
        present(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("all fields is require!"));
    };
    let email = normalize_email(&email);

    // Fast path only; the unique indexes decide under concurrent signups.
    if st.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::conflict("this username is taken!"));
    }
    if st.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("this email is taken!"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password cant be lower than 6 character!",
        ));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("invalid email! plz review"));
    }

    let password_hash = hash_password(&password)?;
    let user = st
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    let token = JwtKeys::from_ref(st).sign(user.id)?;
    info!(user_id = %user.id, username = %user.username, "user signed up");
    Ok((PublicUser::from(&user), token))
}

/// Checks credentials and returns a fresh session token.
pub async fn login(st: &AppState, req: LoginRequest) -> AppResult<String> {
    let (Some(username), Some(password)) =
        (present(req.username), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(AppError::validation("username and password are required!"));
    };

    let user = st
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| {
            warn!(username = %username, "login unknown username");
            AppError::not_found("username not found!")
        })?;

    if !verify_password(&password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized("password is incorrect!"));
    }

    let token = JwtKeys::from_ref(st).sign(user.id)?;
    info!(user_id = %user.id, role = ?user.role, "user logged in");
    Ok(token)
}
