//! AWS Lambda entry point for the change notifier
//!
//! Deploy with `cargo lambda build --release --features lambda`

use lambda_runtime::{Error as LambdaError, service_fn};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Stockwatch notifier starting...");
    lambda_runtime::run(service_fn(stockwatch::lambda::stream_handler)).await
}
