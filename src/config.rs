use anyhow::{bail, Context, Result};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,

    // Model service
    pub predict_url: String,

    // Storage (memory only when unset)
    pub redis_url: Option<String>,

    // Notifications
    pub toast_ttl: Duration,

    // Native share channel (clipboard fallback when unset)
    pub share_webhook_url: Option<String>,
}

pub const DEFAULT_PREDICT_URL: &str = "http://127.0.0.1:5000/predict";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = Self::parse_environment()?;

        let config = Self {
            environment,
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            predict_url: std::env::var("SALESPRO_PREDICT_URL")
                .unwrap_or_else(|_| DEFAULT_PREDICT_URL.to_string()),

            redis_url: non_empty_var("SALESPRO_REDIS_URL"),

            toast_ttl: Duration::from_secs(
                std::env::var("SALESPRO_TOAST_TTL_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .context("Invalid SALESPRO_TOAST_TTL_SECS")?,
            ),

            share_webhook_url: non_empty_var("SALESPRO_SHARE_WEBHOOK_URL"),
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_environment() -> Result<Environment> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        match env.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => bail!("Unknown environment: {}", env),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.predict_url) {
            bail!("SALESPRO_PREDICT_URL must be HTTP(S) URL");
        }
        if let Some(url) = &self.share_webhook_url {
            if !is_http_url(url) {
                bail!("SALESPRO_SHARE_WEBHOOK_URL must be HTTP(S) URL");
            }
        }
        if self.toast_ttl.is_zero() {
            bail!("SALESPRO_TOAST_TTL_SECS must be greater than zero");
        }

        tracing::info!(
            "Configuration validated for {:?} environment",
            self.environment
        );

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
