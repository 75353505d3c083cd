//! Seed dataset structures.
//!
//! The seeder ships with a static TOML dataset mapping each table name
//! to the records it should contain. Records are flat maps of scalar
//! attributes; anything nested is rejected up front.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::component::ATTR_URL;

/// One seed record: attribute name to scalar value.
pub type SeedRecord = BTreeMap<String, toml::Value>;

/// Root seed dataset: table name to record list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    pub tables: BTreeMap<String, Vec<SeedRecord>>,
}

impl SeedData {
    /// Load seed data from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Total number of records across all tables.
    pub fn record_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Validate that the dataset is non-empty and only carries
    /// scalar attribute values the store can represent.
    pub fn validate(&self) -> Result<()> {
        if self.tables.is_empty() {
            return Err(AppError::validation("No tables defined in seed data"));
        }

        for (table, records) in &self.tables {
            if records.is_empty() {
                return Err(AppError::validation(format!(
                    "Table {table} has no seed records"
                )));
            }

            for record in records {
                for (attribute, value) in record {
                    if !is_scalar(value) {
                        return Err(AppError::validation(format!(
                            "Attribute {attribute} in table {table} is not a scalar value"
                        )));
                    }
                }
                if let Some(value) = record.get(ATTR_URL) {
                    let raw = value.as_str().unwrap_or_default();
                    url::Url::parse(raw).map_err(|e| {
                        AppError::validation(format!(
                            "Invalid {ATTR_URL} in table {table}: {raw}: {e}"
                        ))
                    })?;
                }
            }
        }
        Ok(())
    }
}

fn is_scalar(value: &toml::Value) -> bool {
    matches!(
        value,
        toml::Value::String(_)
            | toml::Value::Boolean(_)
            | toml::Value::Integer(_)
            | toml::Value::Float(_)
    )
}
