use crate::auth::password;
use crate::error::ApiError;

// Argon2 is deliberately slow; keep it off the async worker threads.

pub async fn hash_password(plain: String) -> Result<String, ApiError> {
    let hashed = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })??;
    Ok(hashed)
}

/// Check a login password. `stored_hash` is `None` for unknown user names,
/// which still pay for one Argon2 verification before failing.
pub async fn verify_login(plain: String, stored_hash: Option<String>) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || password::verify_login(&plain, stored_hash.as_deref()))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })
}
