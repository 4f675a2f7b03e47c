use crate::{
    app::AppState,
    error::DashboardError,
    models::{ApiResponse, PreferenceState},
};
use axum::{extract::State, Json};

pub async fn get_preferences(State(state): State<AppState>) -> Json<ApiResponse<PreferenceState>> {
    Json(ApiResponse::ok(PreferenceState {
        theme: state.preferences.theme().await,
        sidebar_collapsed: state.preferences.sidebar_collapsed().await,
    }))
}

pub async fn toggle_theme(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PreferenceState>>, DashboardError> {
    let theme = state.preferences.toggle_theme().await?;

    Ok(Json(ApiResponse::ok(PreferenceState {
        theme,
        sidebar_collapsed: state.preferences.sidebar_collapsed().await,
    })))
}

pub async fn toggle_sidebar(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PreferenceState>>, DashboardError> {
    let sidebar_collapsed = state.preferences.toggle_sidebar().await?;

    Ok(Json(ApiResponse::ok(PreferenceState {
        theme: state.preferences.theme().await,
        sidebar_collapsed,
    })))
}
