use axum::{extract::State, Extension, Json};

use crate::app::AppState;
use crate::database::models::Item;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /Items - every item owned by the caller
pub async fn collection_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let owner = auth.require_user_id()?;
    let items = state.repository.list_items(owner).await?;
    Ok(Json(items))
}
