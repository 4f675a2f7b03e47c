use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CONFIDENCE: f64 = 90.0;
pub const DEFAULT_FACTOR: f64 = 1.0;

/// Raw form fields as the user entered them. Numeric fields stay optional so
/// an empty input box can be told apart from a typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(default)]
    pub store_id: Option<i64>,
    #[serde(default)]
    pub sku_id: Option<i64>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub is_featured_sku: bool,
    #[serde(default)]
    pub is_display_sku: bool,
}

/// Input that passed validation. Only `validate` builds one, so a request
/// can never be issued for rejected input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedInput {
    pub store_id: i64,
    pub sku_id: i64,
    pub total_price: f64,
    pub base_price: f64,
    pub is_featured_sku: bool,
    pub is_display_sku: bool,
}

impl ValidatedInput {
    pub(crate) fn new(
        store_id: i64,
        sku_id: i64,
        total_price: f64,
        base_price: f64,
        is_featured_sku: bool,
        is_display_sku: bool,
    ) -> Self {
        Self {
            store_id,
            sku_id,
            total_price,
            base_price,
            is_featured_sku,
            is_display_sku,
        }
    }

    pub fn to_wire(&self) -> PredictionRequest {
        PredictionRequest {
            store_id: self.store_id,
            sku_id: self.sku_id,
            total_price: self.total_price,
            base_price: self.base_price,
            is_featured_sku: u8::from(self.is_featured_sku),
            is_display_sku: u8::from(self.is_display_sku),
        }
    }
}

/// Body of `POST /predict`. The model expects the flags as 0/1 integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub store_id: i64,
    pub sku_id: i64,
    pub total_price: f64,
    pub base_price: f64,
    pub is_featured_sku: u8,
    pub is_display_sku: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factors {
    #[serde(default = "default_factor")]
    pub store_factor: f64,
    #[serde(default = "default_factor")]
    pub sku_factor: f64,
    #[serde(default = "default_factor")]
    pub price_factor: f64,
    #[serde(default = "default_factor")]
    pub marketing_factor: f64,
}

fn default_factor() -> f64 {
    DEFAULT_FACTOR
}

impl Default for Factors {
    fn default() -> Self {
        Self {
            store_factor: DEFAULT_FACTOR,
            sku_factor: DEFAULT_FACTOR,
            price_factor: DEFAULT_FACTOR,
            marketing_factor: DEFAULT_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: f64,
    pub confidence: f64, // percentage, 0-100
    pub factors: Factors,
}

/// A result together with the input that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSnapshot {
    pub input: ValidatedInput,
    pub result: PredictionResult,
    pub recorded_at: DateTime<Utc>,
}

/// Response body of the model service. Every field is optional because the
/// service has no fixed contract beyond `success`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPredictionResponse {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub prediction: Option<Value>,
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(default)]
    pub factors: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Known shapes of the `prediction` field, tried in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionValue {
    /// `"prediction": 42.5`
    Number(f64),
    /// `"prediction": { "prediction": 42.5 }`, as returned by the Flask model
    Nested(f64),
    /// `"prediction": { "value": "17.25" }`
    Value(f64),
    /// Anything else. Resolves to zero.
    Unrecognized,
}

impl PredictionValue {
    pub fn parse(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Number(n)) => n.as_f64().map(Self::Number).unwrap_or(Self::Unrecognized),
            Some(Value::Object(fields)) => {
                if let Some(v) = fields.get("prediction").and_then(numeric) {
                    Self::Nested(v)
                } else if let Some(v) = fields.get("value").and_then(numeric) {
                    Self::Value(v)
                } else {
                    Self::Unrecognized
                }
            }
            _ => Self::Unrecognized,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(v) | Self::Nested(v) | Self::Value(v) => *v,
            Self::Unrecognized => 0.0,
        }
    }
}

/// Reads a JSON number, or a string holding one.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
