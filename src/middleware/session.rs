use crate::{app::AppState, error::DashboardError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Rejects requests without a stored session and hands the signed-in user
/// to the handler as an `Extension<User>`.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, DashboardError> {
    let Some(user) = state.auth.current_user().await? else {
        tracing::debug!(path = %request.uri().path(), "Request without session");
        return Err(DashboardError::Unauthorized);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
