use axum::{
    extract::State,
    Extension, Json,
};
use tracing::{info, warn};

use crate::app::AppState;
use crate::database::models::Item;
use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::middleware::AuthUser;

/// DELETE /Item/:id - delete an owned item and echo it back
pub async fn record_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Item>, ApiError> {
    let owner = auth.require_user_id()?;

    let Some(item) = state.repository.delete_item(id, owner).await? else {
        warn!("User {} cannot delete item {}: missing or not owned", owner, id);
        return Err(ApiError::item_not_found());
    };

    info!("User {} deleted item {}", owner, item.id);
    Ok(Json(item))
}
