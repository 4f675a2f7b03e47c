use crate::models::{PredictionResult, PredictionSnapshot, ValidatedInput};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Issued when a submission starts. Only the most recently issued token may
/// update the displayed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Holds the displayed prediction and discards responses to superseded
/// submissions, whatever order they resolve in.
pub struct ResultTracker {
    issued: AtomicU64,
    latest: RwLock<Option<PredictionSnapshot>>,
}

impl Default for ResultTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultTracker {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    pub fn begin(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Records the result if `token` is still current. Returns whether it was applied.
    pub async fn complete(
        &self,
        token: RequestToken,
        input: ValidatedInput,
        result: PredictionResult,
    ) -> bool {
        let mut latest = self.latest.write().await;

        if !self.is_current(token) {
            tracing::debug!(
                generation = token.0,
                current = self.issued.load(Ordering::SeqCst),
                "Discarding stale prediction response"
            );
            return false;
        }

        *latest = Some(PredictionSnapshot {
            input,
            result,
            recorded_at: Utc::now(),
        });
        true
    }

    pub async fn current(&self) -> Option<PredictionSnapshot> {
        self.latest.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Factors;

    fn input(store_id: i64) -> ValidatedInput {
        ValidatedInput::new(store_id, 1, 10.0, 8.0, false, false)
    }

    fn result(prediction: f64) -> PredictionResult {
        PredictionResult {
            prediction,
            confidence: 90.0,
            factors: Factors::default(),
        }
    }

    #[tokio::test]
    async fn newest_submission_wins_even_when_it_resolves_first() {
        let tracker = ResultTracker::new();

        let a = tracker.begin();
        let b = tracker.begin();

        assert!(tracker.complete(b, input(2), result(20.0)).await);
        assert!(!tracker.complete(a, input(1), result(10.0)).await);

        let shown = tracker.current().await.unwrap();
        assert_eq!(shown.result.prediction, 20.0);
        assert_eq!(shown.input.store_id, 2);
    }

    #[tokio::test]
    async fn sequential_submissions_replace_each_other() {
        let tracker = ResultTracker::new();
        assert!(tracker.current().await.is_none());

        let first = tracker.begin();
        assert!(tracker.complete(first, input(1), result(1.0)).await);
        let second = tracker.begin();
        assert!(tracker.complete(second, input(1), result(2.0)).await);

        assert_eq!(tracker.current().await.unwrap().result.prediction, 2.0);
    }

    #[tokio::test]
    async fn stale_response_leaves_previous_result_in_place() {
        let tracker = ResultTracker::new();

        let first = tracker.begin();
        tracker.complete(first, input(1), result(5.0)).await;

        let stale = tracker.begin();
        let _newer = tracker.begin();
        assert!(!tracker.complete(stale, input(9), result(99.0)).await);

        assert_eq!(tracker.current().await.unwrap().result.prediction, 5.0);
    }

    #[test]
    fn tokens_increase_monotonically() {
        let tracker = ResultTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        assert!(b.generation() > a.generation());
        assert!(!tracker.is_current(a));
        assert!(tracker.is_current(b));
    }
}
