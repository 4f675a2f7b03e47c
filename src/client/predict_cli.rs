use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use salespro::{
    config::DEFAULT_PREDICT_URL,
    models::{PredictionInput, PredictionSnapshot},
    services::{export, validate, HttpPredictionClient, PredictionService, ValidationOutcome},
};
use std::path::PathBuf;

/// Submit one prediction request to the model service.
#[derive(Debug, Parser)]
#[command(name = "salespro-predict", version)]
struct Args {
    #[arg(long)]
    store_id: Option<i64>,
    #[arg(long)]
    sku_id: Option<i64>,
    #[arg(long)]
    total_price: Option<f64>,
    #[arg(long)]
    base_price: Option<f64>,
    /// Mark the SKU as featured
    #[arg(long)]
    featured: bool,
    /// Mark the SKU as on display
    #[arg(long)]
    display: bool,
    /// Model endpoint; defaults to SALESPRO_PREDICT_URL
    #[arg(long)]
    url: Option<String>,
    /// Write the result as CSV into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let endpoint = args.url.clone().unwrap_or_else(|| {
        std::env::var("SALESPRO_PREDICT_URL").unwrap_or_else(|_| DEFAULT_PREDICT_URL.to_string())
    });

    println!("SalesPro Predictor");
    println!("==================");
    println!("Server: {}", endpoint);
    println!();

    let input = PredictionInput {
        store_id: args.store_id,
        sku_id: args.sku_id,
        total_price: args.total_price,
        base_price: args.base_price,
        is_featured_sku: args.featured,
        is_display_sku: args.display,
    };

    let validated = match validate(&input) {
        ValidationOutcome::Valid(validated) => validated,
        ValidationOutcome::Invalid(errors) => {
            println!("[ERROR] Please fix the errors in the input:");
            for field in errors.fields() {
                for message in errors.get(field) {
                    println!("   {:?}: {}", field, message);
                }
            }
            std::process::exit(2);
        }
    };

    let client = HttpPredictionClient::new(endpoint)?;

    let result = match client.predict(&validated).await {
        Ok(result) => result,
        Err(e) => {
            println!("[FAILED] {}: {}", e.title(), e.user_message());
            std::process::exit(1);
        }
    };

    let snapshot = PredictionSnapshot {
        input: validated,
        result,
        recorded_at: Utc::now(),
    };

    println!("[SUCCESS] Received prediction:");
    println!();
    println!("{}", export::share_text(&snapshot));
    println!();
    println!(
        "Factors: store={} sku={} price={} marketing={}",
        snapshot.result.factors.store_factor,
        snapshot.result.factors.sku_factor,
        snapshot.result.factors.price_factor,
        snapshot.result.factors.marketing_factor,
    );

    if let Some(dir) = args.export_dir {
        let path = dir.join(export::export_file_name(snapshot.recorded_at));
        tokio::fs::write(&path, export::export_csv(&snapshot)?).await?;
        println!("   [OK] Exported to {}", path.display());
    }

    Ok(())
}
