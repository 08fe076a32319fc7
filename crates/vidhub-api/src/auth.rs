use std::sync::Arc;

use anyhow::Context;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::info;
use uuid::Uuid;

use vidhub_db::models::NewUser;
use vidhub_db::{Database, is_constraint_violation};
use vidhub_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidJson, required};

/// Bearer tokens are valid for seven days from issue.
pub const TOKEN_TTL_DAYS: i64 = 7;

const MIN_PASSWORD_LEN: usize = 6;

/// Same response for an unknown email and a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    const MISSING: &str = "All fields are required";
    let first_name = required(&req.first_name, MISSING)?;
    let last_name = required(&req.last_name, MISSING)?;
    let email = normalize_email(required(&req.email, MISSING)?);
    if req.password.is_empty() {
        return Err(ApiError::bad_request(MISSING));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    // Check if email is taken
    if state.db.get_user_by_email(&email)?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4().to_string();
    let avatar = req.avatar.as_deref().map(str::trim).unwrap_or_default();

    let user = state
        .db
        .create_user(&NewUser {
            id: &user_id,
            first_name,
            last_name,
            email: &email,
            password_hash: &password_hash,
            avatar,
        })
        .map_err(|e| {
            // Lost a race with a concurrent registration for the same email
            if is_constraint_violation(&e) {
                ApiError::conflict("Email already registered")
            } else {
                ApiError::Internal(e.context("creating user"))
            }
        })?;

    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            user: convert::user_profile(&user, &[]),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = normalize_email(required(&req.email, "All fields are required")?);
    if req.password.is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored hash for {} is unreadable: {}", user.id, e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let user_id: Uuid = user.id.parse().context("stored user id is not a UUID")?;
    let token = create_token(&state.jwt_secret, user_id, &user.email)?;
    let channel_ids = state.db.channel_ids_for_user(&user.id)?;

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
        user: convert::user_profile(&user, &channel_ids),
    }))
}

pub fn create_token(secret: &str, user_id: Uuid, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify signature and expiry of an HS256 token.
pub fn decode_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_token(SECRET, user_id, "ada@example.com").unwrap();

        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ada@example.com");

        let ttl = claims.exp as i64 - chrono::Utc::now().timestamp();
        assert!(ttl > 0 && ttl <= TOKEN_TTL_DAYS * 24 * 3600);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = create_token(SECRET, Uuid::new_v4(), "ada@example.com").unwrap();
        assert!(decode_token("another-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "ada@example.com".into(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(decode_token(SECRET, &token).is_err());
    }

    #[test]
    fn password_hash_is_salted_and_verifiable() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();
        assert_ne!(first, second);

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(Argon2::default().verify_password(b"hunter22", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"hunter23", &parsed).is_err());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
