use axum::{
    extract::State,
    Extension, Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::app::AppState;
use crate::database::models::Item;
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionQuery {
    #[serde(alias = "IsComplete")]
    pub is_complete: bool,
}

/// PUT /Item/:id?isComplete=bool - set the completion flag of an owned item
pub async fn record_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<CompletionQuery>,
) -> Result<Json<Item>, ApiError> {
    let owner = auth.require_user_id()?;

    match state
        .repository
        .set_item_completion(id, owner, query.is_complete)
        .await?
    {
        Some(item) => {
            info!("User {} set item {} complete={}", owner, id, item.is_complete);
            Ok(Json(item))
        }
        None => {
            warn!("User {} cannot update item {}: missing or not owned", owner, id);
            Err(ApiError::item_not_found())
        }
    }
}
