use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::Claims;
use crate::error::ApiError;

/// Authenticated identity extracted from a validated bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    /// Raw identifier claim; see [`current_user_id`].
    pub nameidentifier: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            name: claims.name,
            email: claims.email,
            role: claims.role,
            nameidentifier: claims.nameidentifier,
        }
    }
}

/// Numeric id of the caller, or `None` when the identifier claim is absent
/// or not an integer. Item handlers scope every store call by this id.
pub fn current_user_id(identity: &AuthUser) -> Option<i32> {
    identity.nameidentifier.trim().parse().ok()
}

impl AuthUser {
    /// [`current_user_id`], rejecting the request when there is none.
    pub fn require_user_id(&self) -> Result<i32, ApiError> {
        current_user_id(self).ok_or_else(|| {
            tracing::warn!("Token for '{}' has no usable identifier claim", self.name);
            ApiError::unauthorized("Token does not identify a user")
        })
    }
}

/// JWT authentication middleware that validates tokens and injects [`AuthUser`]
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = state.tokens.validate(&token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
