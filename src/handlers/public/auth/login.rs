// handlers/public/auth/login.rs - POST /login handler

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::utils::verify_login;
use crate::app::AppState;
use crate::auth::TokenSubject;
use crate::error::ApiError;
use crate::extract::ApiJson;

const INVALID_CREDENTIALS: &str = "Invalid user name or password";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login - Authenticate user and receive a bearer token
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// Unknown user names and wrong passwords get the same 401 message.
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_name = payload.user_name.trim();

    let user = state.repository.find_user_by_name(user_name).await?;

    // Unknown names are verified against a placeholder hash so both failures cost the same
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_login(payload.password, stored_hash).await?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            warn!("Login failed for user '{}': wrong password", user.user_name);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            warn!("Login failed for unknown user '{}'", user_name);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = state.tokens.issue(&TokenSubject {
        user_id: user.id,
        user_name: user.user_name.clone(),
        email: user.email.clone(),
    })?;

    info!("User '{}' (id {}) logged in", user.user_name, user.id);

    Ok(Json(json!({ "token": token })))
}
