use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use tracing::{debug, warn};

use super::{
    dto::SessionUser,
    jwt::{JwtKeys, SESSION_COOKIE},
};
use crate::{errors::AppError, state::AppState};

/// Resolves the session cookie to a live user record.
///
/// Missing cookie, a token that fails verification (forged and expired alike)
/// and a token whose user has since been deleted all reject with
/// `Unauthorized`. Only the rejected request is affected.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::unauthorized("token is required"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = match keys.verify(&token) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "session token rejected");
                return Err(AppError::unauthorized("token is invalid"));
            }
        };

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "session refers to a deleted user");
                AppError::unauthorized("user not found!")
            })?;

        Ok(CurrentUser(user.into()))
    }
}
