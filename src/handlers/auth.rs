use crate::{
    app::AppState,
    error::DashboardError,
    models::{ApiResponse, LoginRequest, RegisterRequest, User},
};
use axum::{extract::State, Extension, Json};

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<User>>, DashboardError> {
    let user = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(ApiResponse::ok(user)))
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<User>>, DashboardError> {
    let user = state
        .auth
        .register(&body.name, &body.email, &body.password)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<ApiResponse<()>>, DashboardError> {
    state.auth.logout().await?;
    Ok(Json(ApiResponse::ok(())))
}

pub async fn me(Extension(user): Extension<User>) -> Json<ApiResponse<User>> {
    Json(ApiResponse::ok(user))
}
