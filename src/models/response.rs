use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Theme, User};

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub redis: bool,
    pub prediction_endpoint: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NavItem {
    pub name: String,
    pub href: String,
    pub active: bool,
}

/// Everything the layout chrome (sidebar and header) needs for one page.
#[derive(Serialize, Deserialize, Debug)]
pub struct LayoutView {
    pub title: String,
    pub navigation: Vec<NavItem>,
    pub sidebar_collapsed: bool,
    pub theme: Theme,
    pub user: User,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PreferenceState {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShareOutcome {
    Shared,
    Copied,
    Failed,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ShareReport {
    pub outcome: ShareOutcome,
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubmissionReport<T> {
    /// False when a newer submission was issued before this one resolved.
    pub applied: bool,
    pub result: T,
}
