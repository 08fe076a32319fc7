use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{AppState, decode_token};
use crate::error::ApiError;

/// Identity of the caller, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: String,
}

impl AuthUser {
    /// 403 with `message` unless the caller is the recorded owner.
    pub fn ensure_owns(&self, owner_id: &str, message: &str) -> Result<(), ApiError> {
        if owner_id == self.id.to_string() {
            Ok(())
        } else {
            Err(ApiError::forbidden(message))
        }
    }
}

/// Extract and validate the JWT from the Authorization header, then resolve
/// it to a stored user.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::unauthorized("Not authorized, token missing"))?;

    let claims = decode_token(&state.jwt_secret, token).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        ApiError::unauthorized("Not authorized, invalid or expired token")
    })?;

    let user = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or_else(|| {
            debug!("Token subject {} has no user record", claims.sub);
            ApiError::unauthorized("User not found")
        })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: user.username,
        email: user.email,
        avatar: user.avatar,
    });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
