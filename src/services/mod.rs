pub mod export;
pub mod navigation;
pub mod predictor;
pub mod session;
pub mod share;
pub mod storage;
pub mod toasts;
pub mod tracker;
pub mod validation;

pub use predictor::{normalize_response, HttpPredictionClient, PredictionService};
pub use session::{AuthService, Preferences, SessionStore, StoredSession};
pub use share::{share_result, ClipboardSink, ShareChannel, StoredClipboard, WebhookShare};
pub use storage::StorageService;
pub use toasts::ToastQueue;
pub use tracker::{RequestToken, ResultTracker};
pub use validation::{validate, Field, FieldErrors, ValidationOutcome};
