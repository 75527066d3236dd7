use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, is_valid_email, verify_password, MIN_PASSWORD_LEN},
        repo::revoke_token,
        repo_types::User,
    },
    error::ApiError,
    state::AppState,
};

const MAX_USERNAME_LEN: usize = 150;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue(keys: &JwtKeys, user: User) -> Result<AuthResponse, ApiError> {
    let (access_token, refresh_token) = keys.sign_pair(user.id).map_err(|e| {
        error!(error = %e, user_id = %user.id, "jwt sign failed");
        ApiError::internal(e)
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
    })
}

pub(crate) fn validate_registration(payload: &mut RegisterRequest) -> Result<(), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_owned();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.username.is_empty() || payload.username.chars().count() > MAX_USERNAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "Username must be 1 to {MAX_USERNAME_LEN} characters"
        )));
    }
    if payload.password != payload.password_confirm {
        return Err(ApiError::BadRequest("Passwords do not match".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_registration(&mut payload)?;

    // Ensure email and username are not taken
    if User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::internal)?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }
    if User::username_taken(&state.db, &payload.username)
        .await
        .map_err(ApiError::internal)?
    {
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::internal(e)
    })?;

    let user = match User::create(&state.db, &payload.email, &payload.username, &hash).await {
        Ok(u) => u,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            // lost a race with a concurrent registration
            return Err(ApiError::Conflict("Email or username already registered".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::internal(e));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    let keys = JwtKeys::from_ref(&state);
    Ok((StatusCode::CREATED, Json(issue(&keys, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::internal(e));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::internal(e)
    })?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, "user logged in");
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(issue(&keys, user)?))
}

/// Verify a refresh token and mark it used. A token can be spent once.
async fn spend_refresh_token(state: &AppState, token: &str) -> Result<uuid::Uuid, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let claims = keys
        .verify_refresh(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp as i64)
        .map_err(ApiError::internal)?;
    let fresh = revoke_token(&state.db, claims.jti, claims.sub, expires_at)
        .await
        .map_err(ApiError::internal)?;
    if !fresh {
        warn!(user_id = %claims.sub, jti = %claims.jti, "refresh token reused");
        return Err(ApiError::Unauthorized("Refresh token already used".into()));
    }
    Ok(claims.sub)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user_id = spend_refresh_token(&state, &payload.refresh_token).await?;

    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    let keys = JwtKeys::from_ref(&state);
    Ok(Json(issue(&keys, user)?))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    let owner = spend_refresh_token(&state, &payload.refresh_token).await?;
    if owner != user_id {
        return Err(ApiError::BadRequest("Refresh token belongs to another user".into()));
    }
    info!(%user_id, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| {
            error!(user_id = %user_id, "user not found");
            ApiError::Unauthorized("User not found".into())
        })?;

    Ok(Json(PublicUser::from(user)))
}
