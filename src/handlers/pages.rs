use crate::{
    app::AppState,
    error::DashboardError,
    models::{ApiResponse, LayoutView, User},
    services::navigation,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    #[serde(default)]
    pub path: String,
}

pub async fn layout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<LayoutQuery>,
) -> Json<ApiResponse<LayoutView>> {
    let path = navigation::resolve(&query.path);

    Json(ApiResponse::ok(LayoutView {
        title: navigation::title_for(path).to_string(),
        navigation: navigation::nav_items(path),
        sidebar_collapsed: state.preferences.sidebar_collapsed().await,
        theme: state.preferences.theme().await,
        user,
    }))
}

pub async fn page(
    Extension(user): Extension<User>,
    Path(page): Path<String>,
) -> Result<Json<ApiResponse<Value>>, DashboardError> {
    let content = match page.as_str() {
        "analytics" => navigation::analytics_page(),
        "inventory" => navigation::inventory_page(),
        "settings" => navigation::settings_page(&user.name, &user.email),
        other => return Err(DashboardError::NotFound(format!("page {}", other))),
    };

    Ok(Json(ApiResponse::ok(content)))
}

/// Settings actions only acknowledge through a toast; nothing is stored.
pub async fn settings_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Json<ApiResponse<String>>, DashboardError> {
    let toasts = &state.toasts;

    let id = match action.as_str() {
        "profile" => {
            toasts
                .success("Profile Updated", "Your profile has been saved successfully")
                .await
        }
        "notifications" => {
            toasts
                .success("Preferences Saved", "Your notification preferences have been updated")
                .await
        }
        "password" => {
            toasts
                .info("Change Password", "Password change form will open here")
                .await
        }
        "two-factor" => {
            toasts
                .info("Two-Factor Authentication", "Two-factor setup will be available soon")
                .await
        }
        "delete-account" => {
            toasts
                .warning("Account Deletion", "Account deletion process will be implemented")
                .await
        }
        other => return Err(DashboardError::NotFound(format!("settings action {}", other))),
    };

    Ok(Json(ApiResponse::ok(id)))
}
