use crate::models::{Toast, ToastKind};
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
struct Queued {
    seq: u64,
    toast: Toast,
}

/// Pending notifications. Entries leave the queue when dismissed or when
/// their time-to-live runs out.
pub struct ToastQueue {
    entries: Cache<String, Queued>,
    seq: AtomicU64,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(100)
                .time_to_live(ttl)
                .build(),
            seq: AtomicU64::new(0),
        }
    }

    pub async fn push(&self, title: &str, message: &str, kind: ToastKind) -> String {
        let toast = Toast {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
        };
        let id = toast.id.clone();
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(kind = ?kind, "Toast: {} - {}", title, message);
        self.entries.insert(id.clone(), Queued { seq, toast }).await;
        id
    }

    pub async fn success(&self, title: &str, message: &str) -> String {
        self.push(title, message, ToastKind::Success).await
    }

    pub async fn error(&self, title: &str, message: &str) -> String {
        self.push(title, message, ToastKind::Error).await
    }

    pub async fn warning(&self, title: &str, message: &str) -> String {
        self.push(title, message, ToastKind::Warning).await
    }

    pub async fn info(&self, title: &str, message: &str) -> String {
        self.push(title, message, ToastKind::Info).await
    }

    pub async fn get(&self, id: &str) -> Option<Toast> {
        self.entries.get(id).await.map(|q| q.toast)
    }

    /// Removes a toast. Returns false if it was already gone.
    pub async fn dismiss(&self, id: &str) -> bool {
        self.entries.remove(id).await.is_some()
    }

    /// Live toasts, oldest first.
    pub async fn list(&self) -> Vec<Toast> {
        let mut queued: Vec<Queued> = self.entries.iter().map(|(_, q)| q).collect();
        queued.sort_by_key(|q| q.seq);
        queued.into_iter().map(|q| q.toast).collect()
    }
}
