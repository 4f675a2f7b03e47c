use crate::models::{PredictionInput, ValidatedInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STORE_ID_MESSAGE: &str = "Store ID must be a positive number";
pub const SKU_ID_MESSAGE: &str = "SKU ID must be a positive number";
pub const TOTAL_PRICE_MESSAGE: &str = "Total price must be a positive number";
pub const BASE_PRICE_MESSAGE: &str = "Base price must be a positive number";
pub const BASE_EXCEEDS_TOTAL_MESSAGE: &str = "Base price cannot exceed total price";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    StoreId,
    SkuId,
    TotalPrice,
    BasePrice,
}

/// Messages per form field. A field may carry several messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    fn add(&mut self, field: Field, message: &str) {
        self.0.entry(field).or_default().push(message.to_string());
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(ValidatedInput),
    Invalid(FieldErrors),
}

/// Checks every rule independently and reports all violations at once.
/// Absent numbers compare as zero, the form's empty value.
pub fn validate(input: &PredictionInput) -> ValidationOutcome {
    let mut errors = FieldErrors::default();

    let store_id = input.store_id.filter(|id| *id > 0);
    if store_id.is_none() {
        errors.add(Field::StoreId, STORE_ID_MESSAGE);
    }

    let sku_id = input.sku_id.filter(|id| *id > 0);
    if sku_id.is_none() {
        errors.add(Field::SkuId, SKU_ID_MESSAGE);
    }

    let total_price = input.total_price.filter(|p| is_positive(*p));
    if total_price.is_none() {
        errors.add(Field::TotalPrice, TOTAL_PRICE_MESSAGE);
    }

    let base_price = input.base_price.filter(|p| is_positive(*p));
    if base_price.is_none() {
        errors.add(Field::BasePrice, BASE_PRICE_MESSAGE);
    }

    if input.base_price.unwrap_or(0.0) > input.total_price.unwrap_or(0.0) {
        errors.add(Field::BasePrice, BASE_EXCEEDS_TOTAL_MESSAGE);
    }

    match (store_id, sku_id, total_price, base_price) {
        (Some(store_id), Some(sku_id), Some(total_price), Some(base_price)) if errors.is_empty() => {
            ValidationOutcome::Valid(ValidatedInput::new(
                store_id,
                sku_id,
                total_price,
                base_price,
                input.is_featured_sku,
                input.is_display_sku,
            ))
        }
        _ => ValidationOutcome::Invalid(errors),
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
