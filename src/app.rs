use crate::{
    config::Config,
    handlers::*,
    middleware::require_session,
    services::*,
};
use anyhow::Result;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State shared by every handler. Everything the pages need is passed in
/// here; nothing is ambient.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn PredictionService>,
    pub tracker: Arc<ResultTracker>,
    pub toasts: Arc<ToastQueue>,
    pub auth: Arc<AuthService>,
    pub preferences: Arc<Preferences>,
    pub storage: Arc<StorageService>,
    pub clipboard: Arc<StoredClipboard>,
    pub share_channel: Option<Arc<dyn ShareChannel>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        storage: Arc<StorageService>,
        predictor: Arc<dyn PredictionService>,
        share_channel: Option<Arc<dyn ShareChannel>>,
        toast_ttl: Duration,
    ) -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(StoredSession::new(storage.clone()));

        Self {
            predictor,
            tracker: Arc::new(ResultTracker::new()),
            toasts: Arc::new(ToastQueue::new(toast_ttl)),
            auth: Arc::new(AuthService::new(sessions)),
            preferences: Arc::new(Preferences::new(storage.clone())),
            clipboard: Arc::new(StoredClipboard::new(storage.clone())),
            storage,
            share_channel,
            started_at: Instant::now(),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let storage = Arc::new(StorageService::new(config.redis_url.as_deref()).await?);
        let predictor: Arc<dyn PredictionService> =
            Arc::new(HttpPredictionClient::new(config.predict_url.clone())?);
        let share_channel = config
            .share_webhook_url
            .as_ref()
            .map(|url| Arc::new(WebhookShare::new(url.clone())) as Arc<dyn ShareChannel>);

        Ok(Self::new(storage, predictor, share_channel, config.toast_ttl))
    }
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register));

    let protected = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/layout", get(layout))
        .route("/api/preferences", get(get_preferences))
        .route("/api/preferences/theme", post(toggle_theme))
        .route("/api/preferences/sidebar", post(toggle_sidebar))
        .route("/api/predict", post(submit_prediction))
        .route("/api/prediction", get(current_prediction))
        .route("/api/prediction/export", get(export_prediction))
        .route("/api/prediction/share", post(share_prediction))
        .route("/api/clipboard", get(read_clipboard))
        .route("/api/toasts", get(list_toasts))
        .route("/api/toasts/:id", delete(dismiss_toast))
        .route("/api/pages/:page", get(page))
        .route("/api/settings/:action", post(settings_action))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    public.merge(protected).with_state(state)
}
