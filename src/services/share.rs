use crate::{
    error::ShareError,
    models::ShareOutcome,
    services::{export::SHARE_TITLE, StorageService, ToastQueue},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

pub const CLIPBOARD_KEY: &str = "salespro_clipboard";

/// A platform share action.
#[async_trait]
pub trait ShareChannel: Send + Sync {
    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

#[async_trait]
pub trait ClipboardSink: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

#[derive(Serialize)]
struct SharePayload<'a> {
    title: &'a str,
    text: &'a str,
}

/// Posts the share payload to a configured webhook.
pub struct WebhookShare {
    client: Client,
    url: String,
}

impl WebhookShare {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ShareChannel for WebhookShare {
    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError> {
        self.client
            .post(&self.url)
            .json(&SharePayload { title, text })
            .send()
            .await
            .map_err(|e| ShareError::Channel(e.to_string()))?
            .error_for_status()
            .map_err(|e| ShareError::Channel(e.to_string()))?;

        tracing::info!("Prediction shared via {}", self.url);
        Ok(())
    }
}

/// Clipboard buffer kept in storage; the front end reads it back and
/// copies it into the browser clipboard.
pub struct StoredClipboard {
    storage: Arc<StorageService>,
}

impl StoredClipboard {
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self { storage }
    }

    pub async fn read_text(&self) -> Option<String> {
        self.storage.get::<String>(CLIPBOARD_KEY).await.ok().flatten()
    }
}

#[async_trait]
impl ClipboardSink for StoredClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ShareError> {
        self.storage
            .set(CLIPBOARD_KEY, &text)
            .await
            .map_err(|e| ShareError::Clipboard(format!("{:#}", e)))
    }
}

/// Shares through the native channel when there is one, otherwise copies to
/// the clipboard. The outcome is reported as a toast and never fails the caller.
pub async fn share_result(
    text: &str,
    native: Option<&dyn ShareChannel>,
    clipboard: &dyn ClipboardSink,
    toasts: &ToastQueue,
) -> ShareOutcome {
    let attempt = match native {
        Some(channel) => channel.share(SHARE_TITLE, text).await.map(|_| ShareOutcome::Shared),
        None => clipboard.write_text(text).await.map(|_| ShareOutcome::Copied),
    };

    match attempt {
        Ok(ShareOutcome::Shared) => {
            toasts
                .success("Shared Successfully", "Prediction shared successfully")
                .await;
            ShareOutcome::Shared
        }
        Ok(_) => {
            toasts
                .success("Copied to Clipboard", "Prediction details copied to clipboard")
                .await;
            ShareOutcome::Copied
        }
        Err(e) => {
            tracing::warn!("Share failed: {}", e);
            toasts.error("Share Failed", "Failed to share prediction").await;
            ShareOutcome::Failed
        }
    }
}
