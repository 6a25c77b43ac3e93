use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use crate::app::AppState;
use crate::database::models::NewItem;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::AuthUser;

/// POST /Item - create an item for the caller
///
/// The body's `isComplete` is ignored; items are always created incomplete.
/// Responds 201 with the stored item and a `Location` header.
pub async fn record_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<NewItem>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = auth.require_user_id()?;
    let name = payload
        .validated_name()
        .map_err(|fields| ApiError::validation_error("Invalid item", Some(fields)))?;

    let item = state.repository.insert_item(&name, owner).await?;
    info!("User {} created item {}", owner, item.id);

    let location = format!("/Item/{}", item.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(item)))
}
