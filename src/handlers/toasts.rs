use crate::{
    app::AppState,
    error::DashboardError,
    models::{ApiResponse, Toast},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_toasts(State(state): State<AppState>) -> Json<ApiResponse<Vec<Toast>>> {
    Json(ApiResponse::ok(state.toasts.list().await))
}

pub async fn dismiss_toast(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, DashboardError> {
    if state.toasts.dismiss(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DashboardError::NotFound(format!("toast {}", id)))
    }
}
