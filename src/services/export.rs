use crate::models::PredictionSnapshot;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub const CSV_HEADER: [&str; 8] = [
    "Prediction",
    "Confidence",
    "Store ID",
    "SKU ID",
    "Total Price",
    "Base Price",
    "Featured",
    "Display",
];

pub const SHARE_TITLE: &str = "Sales Prediction Result";

/// Single-row CSV for the given prediction.
pub fn export_csv(snapshot: &PredictionSnapshot) -> Result<Vec<u8>> {
    let input = &snapshot.input;
    let result = &snapshot.result;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;
    writer
        .write_record([
            result.prediction.to_string(),
            format!("{:.1}%", result.confidence),
            input.store_id.to_string(),
            input.sku_id.to_string(),
            input.total_price.to_string(),
            input.base_price.to_string(),
            yes_no(input.is_featured_sku).to_string(),
            yes_no(input.is_display_sku).to_string(),
        ])
        .context("Failed to write CSV row")?;

    let mut bytes = writer.into_inner().context("Failed to flush CSV export")?;
    // The download is `header\nrow` with no terminator after the row.
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(bytes)
}

/// Download name, suffixed with the current time in milliseconds.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("sales_prediction_{}.csv", now.timestamp_millis())
}

pub fn share_text(snapshot: &PredictionSnapshot) -> String {
    let input = &snapshot.input;
    let result = &snapshot.result;

    format!(
        "Sales Prediction: {} units ({:.1}% confidence)\n\nStore ID: {}\nSKU ID: {}\nTotal Price: ${}\nBase Price: ${}",
        result.prediction,
        result.confidence,
        input.store_id,
        input.sku_id,
        input.total_price,
        input.base_price,
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
