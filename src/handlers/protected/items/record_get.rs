use axum::{
    extract::State,
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::Item;
use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::middleware::AuthUser;

/// GET /Item/:id - show a single item owned by the caller
pub async fn record_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Item>, ApiError> {
    let owner = auth.require_user_id()?;
    state
        .repository
        .find_owned_item(id, owner)
        .await?
        .map(Json)
        .ok_or_else(ApiError::item_not_found)
}
