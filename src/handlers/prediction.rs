use crate::{
    app::AppState,
    error::DashboardError,
    models::{
        ApiResponse, PredictionInput, PredictionResult, PredictionSnapshot, ShareReport,
        SubmissionReport,
    },
    services::{export, share_result, validate, ValidationOutcome},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

/// Validates, calls the model and records the result if this is still the
/// newest submission.
pub async fn submit_prediction(
    State(state): State<AppState>,
    body: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<ApiResponse<SubmissionReport<PredictionResult>>>, DashboardError> {
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => {
            state
                .toasts
                .error("Validation Error", "Please fix the errors in the form")
                .await;
            return Err(DashboardError::MalformedForm(rejection.body_text()));
        }
    };

    let validated = match validate(&input) {
        ValidationOutcome::Valid(validated) => validated,
        ValidationOutcome::Invalid(errors) => {
            state
                .toasts
                .error("Validation Error", "Please fix the errors in the form")
                .await;
            return Err(DashboardError::Validation(errors));
        }
    };

    let token = state.tracker.begin();

    match state.predictor.predict(&validated).await {
        Ok(result) => {
            let applied = state
                .tracker
                .complete(token, validated, result.clone())
                .await;
            Ok(Json(ApiResponse::ok(SubmissionReport { applied, result })))
        }
        Err(e) => {
            if state.tracker.is_current(token) {
                state.toasts.error(e.title(), e.user_message()).await;
            } else {
                tracing::debug!(generation = token.generation(), "Stale submission failed: {}", e);
            }
            Err(e.into())
        }
    }
}

pub async fn current_prediction(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PredictionSnapshot>>, DashboardError> {
    let snapshot = state.tracker.current().await.ok_or(DashboardError::NoPrediction)?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

pub async fn export_prediction(State(state): State<AppState>) -> Result<Response, DashboardError> {
    let snapshot = state.tracker.current().await.ok_or(DashboardError::NoPrediction)?;

    let body = export::export_csv(&snapshot)
        .map_err(|e| DashboardError::ExportError(format!("{:#}", e)))?;
    let file_name = export::export_file_name(Utc::now());

    state
        .toasts
        .success("Export Successful", "Prediction data exported to CSV")
        .await;
    tracing::info!("Exported prediction as {}", file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn share_prediction(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ShareReport>>, DashboardError> {
    let snapshot = state.tracker.current().await.ok_or(DashboardError::NoPrediction)?;
    let text = export::share_text(&snapshot);

    let outcome = share_result(
        &text,
        state.share_channel.as_deref(),
        state.clipboard.as_ref(),
        &state.toasts,
    )
    .await;

    Ok(Json(ApiResponse::ok(ShareReport { outcome, text })))
}

#[derive(Serialize)]
pub struct ClipboardContents {
    pub text: Option<String>,
}

pub async fn read_clipboard(State(state): State<AppState>) -> Json<ApiResponse<ClipboardContents>> {
    Json(ApiResponse::ok(ClipboardContents {
        text: state.clipboard.read_text().await,
    }))
}
