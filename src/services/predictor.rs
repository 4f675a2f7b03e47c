use crate::{
    error::{SubmissionError, UNKNOWN_REJECTION},
    models::{
        prediction::numeric, Factors, PredictionRequest, PredictionResult, PredictionValue,
        RawPredictionResponse, ValidatedInput, DEFAULT_CONFIDENCE, DEFAULT_FACTOR,
    },
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Anything that can turn a validated input into a prediction.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, input: &ValidatedInput) -> Result<PredictionResult, SubmissionError>;

    fn endpoint(&self) -> &str;
}

/// Client for the remote model's `POST /predict`.
///
/// No retry and no timeout beyond reqwest's defaults. Concurrent calls are
/// independent of each other.
pub struct HttpPredictionClient {
    client: Client,
    endpoint: String,
}

impl HttpPredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn post(&self, request: &PredictionRequest) -> Result<Value, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| SubmissionError::Unreachable(e.to_string()))?;

        let status = response.status();

        // Rejections arrive with a 500 status and a JSON body, so the body
        // is read regardless of status.
        response.json::<Value>().await.map_err(|e| {
            SubmissionError::Unreachable(format!("invalid response body ({}): {}", status, e))
        })
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(&self, input: &ValidatedInput) -> Result<PredictionResult, SubmissionError> {
        let request = input.to_wire();

        tracing::debug!(
            store_id = request.store_id,
            sku_id = request.sku_id,
            "Submitting prediction request to {}",
            self.endpoint
        );

        let body = self.post(&request).await?;
        let result = normalize_response(body);

        match &result {
            Ok(r) => tracing::info!(
                "Prediction received: {} units ({:.1}% confidence)",
                r.prediction,
                r.confidence
            ),
            Err(e) => tracing::warn!("Prediction failed: {}", e),
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Maps an arbitrary response body onto a `PredictionResult`.
pub fn normalize_response(body: Value) -> Result<PredictionResult, SubmissionError> {
    if !body.is_object() {
        return Err(SubmissionError::Unreachable(
            "response body is not a JSON object".to_string(),
        ));
    }

    let raw: RawPredictionResponse = serde_json::from_value(body)
        .map_err(|e| SubmissionError::Unreachable(e.to_string()))?;

    if !matches!(raw.success, Some(Value::Bool(true))) {
        let message = match raw.error {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::String(_)) | Some(Value::Null) | None => UNKNOWN_REJECTION.to_string(),
            Some(other) => other.to_string(),
        };
        return Err(SubmissionError::ServerRejected(message));
    }

    let prediction = PredictionValue::parse(raw.prediction.as_ref()).as_f64();

    let confidence = raw
        .confidence
        .as_ref()
        .and_then(numeric)
        .unwrap_or(DEFAULT_CONFIDENCE);

    // Each factor stands alone: one bad field must not discard the others.
    let factors = match raw.factors {
        Some(Value::Object(map)) => {
            let factor = |key: &str| match map.get(key) {
                None => DEFAULT_FACTOR,
                Some(value) => numeric(value).unwrap_or_else(|| {
                    tracing::warn!("Ignoring non-numeric {}: {}", key, value);
                    DEFAULT_FACTOR
                }),
            };
            Factors {
                store_factor: factor("store_factor"),
                sku_factor: factor("sku_factor"),
                price_factor: factor("price_factor"),
                marketing_factor: factor("marketing_factor"),
            }
        }
        _ => Factors::default(),
    };

    Ok(PredictionResult {
        prediction,
        confidence,
        factors,
    })
}
