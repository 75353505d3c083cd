// src/lambda/mod.rs

//! AWS Lambda handlers for the three functions.
//!
//! Each handler owns one invocation: build config, talk to the
//! backing services, reply with a typed payload. Error policy per
//! function:
//! - poller: whole-pass failures go into the response body (the
//!   scheduled trigger has nothing useful to retry),
//! - notifier: publish failures re-raise so the batch is redelivered,
//! - seeder: callback delivery failures re-raise so the provisioning
//!   platform can mark the operation failed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::{NotifierConfig, PollerConfig, SeederConfig};
use crate::error::Result;
use crate::models::{ProvisionRequest, ProvisionResponse, RequestType, SeedData, StreamEvent};
use crate::services::{
    AvailabilityPoller, CallbackClient, PollOutcome, SeedOutcome, SnsChannel, apply_seed,
    process_event,
};
use crate::store::DynamoStore;

/// Response payload of the poller function.
#[derive(Debug, Serialize)]
pub struct PollResponse {
    /// Whether the pass ran to completion
    pub success: bool,

    /// Components loaded from the table
    pub polled: usize,

    /// Flags written back
    pub updated: usize,

    /// Components skipped after a per-item failure
    pub failed: usize,

    /// Error message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Completion timestamp
    pub completed_at: DateTime<Utc>,
}

impl Default for PollResponse {
    fn default() -> Self {
        Self {
            success: false,
            polled: 0,
            updated: 0,
            failed: 0,
            error: None,
            completed_at: Utc::now(),
        }
    }
}

/// Poller entry point; the scheduled trigger payload is ignored.
#[instrument(skip(event))]
pub async fn poll_handler(
    event: LambdaEvent<Value>,
) -> std::result::Result<PollResponse, LambdaError> {
    let (_payload, _context) = event.into_parts();

    match run_poll().await {
        Ok(outcome) => {
            info!(
                "Poll completed: {} polled, {} updated, {} failed",
                outcome.polled, outcome.updated, outcome.failed
            );
            Ok(PollResponse {
                success: true,
                polled: outcome.polled,
                updated: outcome.updated,
                failed: outcome.failed,
                ..PollResponse::default()
            })
        }
        Err(e) => {
            error!("Poll failed: {}", e);
            Ok(PollResponse {
                error: Some(e.to_string()),
                ..PollResponse::default()
            })
        }
    }
}

async fn run_poll() -> Result<PollOutcome> {
    let config = PollerConfig::from_env()?;
    let store = DynamoStore::connect(&config.table_name).await;
    let poller = AvailabilityPoller::from_config(&config.http)?;
    poller.poll_all(&store).await
}

/// Response payload of the notifier function.
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    /// Change records received
    pub records: usize,

    /// Notifications published
    pub published: usize,
}

/// Notifier entry point, invoked per change-feed batch.
#[instrument(skip(event))]
pub async fn stream_handler(
    event: LambdaEvent<StreamEvent>,
) -> std::result::Result<NotifyResponse, LambdaError> {
    let (payload, _context) = event.into_parts();

    let config = NotifierConfig::from_env()?;
    let channel = SnsChannel::connect(&config).await;

    let outcome = process_event(&payload, &channel).await?;
    info!(
        "Processed {} change records, published {}",
        outcome.records, outcome.published
    );

    Ok(NotifyResponse {
        records: outcome.records,
        published: outcome.published,
    })
}

/// Seeder entry point, invoked by the provisioning system.
#[instrument(skip(event))]
pub async fn provision_handler(
    event: LambdaEvent<ProvisionRequest>,
) -> std::result::Result<Value, LambdaError> {
    let (request, context) = event.into_parts();

    let physical_id = physical_resource_id(&request, &context.env_config.log_stream);

    let response = match request.request_type {
        RequestType::Delete => {
            // Table deletion cascades to its items.
            info!("Delete request, nothing to clean up");
            ProvisionResponse::success(
                &request,
                &physical_id,
                "Nothing to clean up on delete",
                BTreeMap::new(),
            )
        }
        RequestType::Create | RequestType::Update => match run_seed().await {
            Ok(outcome) => {
                info!(
                    "Seeded {} records into {} tables",
                    outcome.records, outcome.tables
                );
                let mut data = BTreeMap::new();
                data.insert("SeededTables".to_string(), outcome.tables.to_string());
                data.insert("SeededRecords".to_string(), outcome.records.to_string());
                ProvisionResponse::success(
                    &request,
                    &physical_id,
                    format!(
                        "Seeded {} records into {} tables",
                        outcome.records, outcome.tables
                    ),
                    data,
                )
            }
            Err(e) => {
                error!("Seeding failed: {}", e);
                ProvisionResponse::failure(&request, &physical_id, e.to_string())
            }
        },
    };

    let callback = CallbackClient::new()?;
    callback.send(&request.response_url, &response).await?;

    Ok(serde_json::json!({ "status": response.status }))
}

async fn run_seed() -> Result<SeedOutcome> {
    let config = SeederConfig::from_env();
    let seed = SeedData::load(&config.seed_path)?;

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_dynamodb::Client::new(&sdk_config);

    apply_seed(&seed, |table| DynamoStore::new(client.clone(), table)).await
}

/// Stable resource identifier reported back to the provisioning
/// system: the log stream when the runtime provides one, otherwise
/// whatever the request already carried.
fn physical_resource_id(request: &ProvisionRequest, log_stream: &str) -> String {
    if !log_stream.is_empty() {
        return log_stream.to_string();
    }
    request
        .physical_resource_id
        .clone()
        .unwrap_or_else(|| request.logical_resource_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_response_omits_absent_error() {
        let response = PollResponse {
            success: true,
            polled: 2,
            updated: 2,
            ..PollResponse::default()
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn physical_id_prefers_log_stream() {
        let request: ProvisionRequest = serde_json::from_str(
            r#"{
                "RequestType": "Update",
                "ResponseURL": "https://callback.example/resp",
                "StackId": "stack",
                "RequestId": "req",
                "LogicalResourceId": "TableSeed",
                "PhysicalResourceId": "prior-id"
            }"#,
        )
        .unwrap();

        assert_eq!(physical_resource_id(&request, "stream-9"), "stream-9");
        assert_eq!(physical_resource_id(&request, ""), "prior-id");
    }
}
