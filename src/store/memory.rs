//! In-memory inventory store.
//!
//! Backs local development and tests with the same contract as the
//! deployed table. Cloning a `MemoryStore` yields a handle onto the
//! same underlying table.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{ATTR_AVAILABILITY, ATTR_NAME, ATTR_URL, Component, SeedRecord};
use crate::store::InventoryStore;

/// In-memory component table keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<BTreeMap<String, SeedRecord>>>,
}

impl MemoryStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.items.lock().expect("store lock poisoned").len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one component by identifier.
    pub fn get(&self, name: &str) -> Option<Component> {
        let items = self.items.lock().expect("store lock poisoned");
        items.get(name).map(|record| decode(name, record))
    }
}

fn decode(name: &str, record: &SeedRecord) -> Component {
    Component {
        name: name.to_string(),
        url: record
            .get(ATTR_URL)
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string(),
        availability: record
            .get(ATTR_AVAILABILITY)
            .and_then(|value| value.as_bool()),
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Component>> {
        let items = self.items.lock().expect("store lock poisoned");
        Ok(items
            .iter()
            .map(|(name, record)| decode(name, record))
            .collect())
    }

    async fn update_availability(&self, name: &str, available: bool) -> Result<()> {
        let mut items = self.items.lock().expect("store lock poisoned");
        let record = items
            .entry(name.to_string())
            .or_insert_with(SeedRecord::new);
        record.insert(
            ATTR_AVAILABILITY.to_string(),
            toml::Value::Boolean(available),
        );
        Ok(())
    }

    async fn seed(&self, records: &[SeedRecord]) -> Result<()> {
        let mut items = self.items.lock().expect("store lock poisoned");
        for record in records {
            let name = record
                .get(ATTR_NAME)
                .and_then(|value| value.as_str())
                .ok_or_else(|| {
                    AppError::validation(format!("Seed record missing {ATTR_NAME}"))
                })?;
            items.insert(name.to_string(), record.clone());
        }
        Ok(())
    }
}
