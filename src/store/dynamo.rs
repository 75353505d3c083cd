//! DynamoDB inventory store.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use async_trait::async_trait;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::models::{ATTR_AVAILABILITY, ATTR_NAME, ATTR_URL, Component, SeedRecord};
use crate::store::InventoryStore;

/// DynamoDB-backed component table.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    /// Create a store for an existing table.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Create a store using the default AWS environment configuration.
    pub async fn connect(table: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), table)
    }

    /// Table this store reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl InventoryStore for DynamoStore {
    /// Scan the full table, following pagination.
    async fn get_all(&self) -> Result<Vec<Component>> {
        let mut components = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| AppError::store(e.into_service_error()))?;

            for item in output.items() {
                match decode_component(item) {
                    Some(component) => components.push(component),
                    None => warn!(
                        "Skipping malformed item in {} (missing {} or {})",
                        self.table, ATTR_NAME, ATTR_URL
                    ),
                }
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(components)
    }

    async fn update_availability(&self, name: &str, available: bool) -> Result<()> {
        self.client
            .update_item()
            .table_name(&self.table)
            .key(ATTR_NAME, AttributeValue::S(name.to_string()))
            .update_expression("SET #availability = :available")
            .expression_attribute_names("#availability", ATTR_AVAILABILITY)
            .expression_attribute_values(":available", AttributeValue::Bool(available))
            .send()
            .await
            .map_err(|e| AppError::store(e.into_service_error()))?;
        Ok(())
    }

    async fn seed(&self, records: &[SeedRecord]) -> Result<()> {
        for record in records {
            let item = encode_record(record)?;
            self.client
                .put_item()
                .table_name(&self.table)
                .set_item(Some(item))
                .send()
                .await
                .map_err(|e| AppError::store(e.into_service_error()))?;
        }
        Ok(())
    }
}

/// Decode a table item into a component; `None` when required
/// attributes are missing or mistyped.
fn decode_component(item: &HashMap<String, AttributeValue>) -> Option<Component> {
    let name = item.get(ATTR_NAME)?.as_s().ok()?.clone();
    let url = item.get(ATTR_URL)?.as_s().ok()?.clone();
    let availability = item
        .get(ATTR_AVAILABILITY)
        .and_then(|value| value.as_bool().ok())
        .copied();

    Some(Component {
        name,
        url,
        availability,
    })
}

fn encode_record(record: &SeedRecord) -> Result<HashMap<String, AttributeValue>> {
    record
        .iter()
        .map(|(attribute, value)| Ok((attribute.clone(), to_attribute_value(value)?)))
        .collect()
}

fn to_attribute_value(value: &toml::Value) -> Result<AttributeValue> {
    match value {
        toml::Value::String(s) => Ok(AttributeValue::S(s.clone())),
        toml::Value::Boolean(b) => Ok(AttributeValue::Bool(*b)),
        toml::Value::Integer(i) => Ok(AttributeValue::N(i.to_string())),
        toml::Value::Float(f) => Ok(AttributeValue::N(f.to_string())),
        other => Err(AppError::validation(format!(
            "Unsupported seed value type: {}",
            other.type_str()
        ))),
    }
}
