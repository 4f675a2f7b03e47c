use anyhow::{Context, Result};
use moka::future::Cache;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

/// Key/value store standing in for browser local storage.
///
/// Values are JSON strings. The in-process tier is always present; Redis is
/// used as the durable tier when configured and reachable.
pub struct StorageService {
    redis: Option<redis::aio::ConnectionManager>,
    memory: Cache<String, String>,
}

impl StorageService {
    pub async fn new(redis_url: Option<&str>) -> Result<Self> {
        let redis = match redis_url {
            Some(url) => match redis::Client::open(url) {
                Ok(client) => match client.get_connection_manager().await {
                    Ok(conn) => {
                        tracing::info!("Redis connected successfully");
                        Some(conn)
                    }
                    Err(e) => {
                        tracing::warn!("Redis connection failed: {}, using memory storage only", e);
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!("Redis client creation failed: {}, using memory storage only", e);
                    None
                }
            },
            None => {
                tracing::info!("No Redis URL configured, using memory storage only");
                None
            }
        };

        Ok(Self {
            redis,
            memory: Self::memory_tier(),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            redis: None,
            memory: Self::memory_tier(),
        }
    }

    fn memory_tier() -> Cache<String, String> {
        Cache::builder().max_capacity(10_000).build()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        if let Some(stored) = self.memory.get(key).await {
            let value = serde_json::from_str(&stored)
                .with_context(|| format!("Corrupt value stored under {}", key))?;
            tracing::debug!("Memory storage hit for key: {}", key);
            return Ok(Some(value));
        }

        if let Some(mut redis) = self.redis.clone() {
            match redis.get::<_, Option<String>>(key).await {
                Ok(Some(stored)) => {
                    let value = serde_json::from_str(&stored)
                        .with_context(|| format!("Corrupt value stored under {}", key))?;
                    self.memory.insert(key.to_string(), stored).await;
                    tracing::debug!("Redis storage hit for key: {}", key);
                    return Ok(Some(value));
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Redis get error: {}", e),
            }
        }

        Ok(None)
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = serde_json::to_string(value)?;

        self.memory.insert(key.to_string(), serialized.clone()).await;

        if let Some(mut redis) = self.redis.clone() {
            if let Err(e) = redis.set::<_, _, ()>(key, serialized).await {
                tracing::warn!("Redis set error: {}", e);
            } else {
                tracing::debug!("Stored key: {}", key);
            }
        }

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.memory.invalidate(key).await;

        if let Some(mut redis) = self.redis.clone() {
            if let Err(e) = redis.del::<_, ()>(key).await {
                tracing::warn!("Redis del error: {}", e);
            }
        }

        Ok(())
    }

    pub async fn ping(&self) -> Result<bool> {
        if let Some(mut redis) = self.redis.clone() {
            match redis::cmd("PING").query_async::<_, String>(&mut redis).await {
                Ok(_) => Ok(true),
                Err(_) => Ok(false),
            }
        } else {
            Ok(false)
        }
    }
}
