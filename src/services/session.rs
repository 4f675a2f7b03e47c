use crate::{
    error::DashboardError,
    models::{Theme, User},
    services::StorageService,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

pub const SESSION_KEY: &str = "salespro_user";
pub const THEME_KEY: &str = "salespro_theme";
pub const SIDEBAR_KEY: &str = "salespro_sidebar_collapsed";

/// Persistence for the signed-in user.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<User>>;
    async fn save(&self, user: &User) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

pub struct StoredSession {
    storage: Arc<StorageService>,
}

impl StoredSession {
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SessionStore for StoredSession {
    async fn load(&self) -> Result<Option<User>> {
        match self.storage.get::<User>(SESSION_KEY).await {
            Ok(user) => Ok(user),
            Err(e) => {
                // an unreadable record is treated as signed out
                tracing::warn!("Discarding unreadable session: {:#}", e);
                self.storage.remove(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, user: &User) -> Result<()> {
        self.storage.set(SESSION_KEY, user).await
    }

    async fn clear(&self) -> Result<()> {
        self.storage.remove(SESSION_KEY).await
    }
}

/// Mock authentication. Any non-empty credentials are accepted and nothing
/// is checked against a server.
pub struct AuthService {
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn current_user(&self) -> Result<Option<User>, DashboardError> {
        self.sessions.load().await.map_err(storage_error)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, DashboardError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(DashboardError::InvalidCredentials);
        }

        let user = User {
            id: "1".to_string(),
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
        };

        self.sessions.save(&user).await.map_err(storage_error)?;
        tracing::info!("User {} signed in", user.email);
        Ok(user)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DashboardError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(DashboardError::InvalidCredentials);
        }

        let user = User {
            id: Utc::now().timestamp_millis().to_string(),
            email: email.to_string(),
            name: name.trim().to_string(),
        };

        self.sessions.save(&user).await.map_err(storage_error)?;
        tracing::info!("Registered user {}", user.email);
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), DashboardError> {
        self.sessions.clear().await.map_err(storage_error)?;
        tracing::info!("User signed out");
        Ok(())
    }
}

/// Theme and sidebar state mirrored into storage.
pub struct Preferences {
    storage: Arc<StorageService>,
}

impl Preferences {
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self { storage }
    }

    pub async fn theme(&self) -> Theme {
        self.storage
            .get::<Theme>(THEME_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub async fn toggle_theme(&self) -> Result<Theme, DashboardError> {
        let theme = self.theme().await.toggled();
        self.storage.set(THEME_KEY, &theme).await.map_err(storage_error)?;
        Ok(theme)
    }

    pub async fn sidebar_collapsed(&self) -> bool {
        self.storage
            .get::<bool>(SIDEBAR_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    pub async fn toggle_sidebar(&self) -> Result<bool, DashboardError> {
        let collapsed = !self.sidebar_collapsed().await;
        self.storage
            .set(SIDEBAR_KEY, &collapsed)
            .await
            .map_err(storage_error)?;
        Ok(collapsed)
    }
}

fn storage_error(e: anyhow::Error) -> DashboardError {
    DashboardError::StorageError(format!("{:#}", e))
}
