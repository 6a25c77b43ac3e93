// handlers/public/auth/register.rs - POST /register handler

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::utils::hash_password;
use crate::app::AppState;
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::extract::ApiJson;

/// POST /register - Register a new user account
///
/// Input: `{ "userName": "...", "email": "...", "password": "..." }`.
/// The user name must not already exist; the password is stored as an
/// Argon2 hash.
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewUser>,
) -> Result<Json<Value>, ApiError> {
    let user = payload
        .validate()
        .map_err(|fields| ApiError::validation_error("Invalid registration", Some(fields)))?;

    if state.repository.find_user_by_name(&user.user_name).await?.is_some() {
        warn!("Registration rejected, user name '{}' already exists", user.user_name);
        return Err(ApiError::bad_request("User name already exists"));
    }

    let password_hash = hash_password(user.password).await?;

    // The unique index still guards against a concurrent registration of the same name
    let created = state
        .repository
        .insert_user(&user.user_name, user.email.as_deref(), &password_hash)
        .await?;

    info!("Registered user '{}' (id {})", created.user_name, created.id);

    Ok(Json(json!({ "message": "User registered successfully" })))
}
