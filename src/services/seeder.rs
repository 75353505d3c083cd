//! Provisioning-time seeding service.
//!
//! Applies the static seed dataset to the inventory tables and
//! delivers the structured outcome to the provisioning caller. The
//! callback must land exactly once; failing to deliver it stalls the
//! provisioning workflow, so delivery errors are fatal.

use tracing::{error, info};

use crate::error::{AppError, Result};
use crate::models::{ProvisionResponse, SeedData};
use crate::store::InventoryStore;

/// Summary of an applied seed dataset.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedOutcome {
    /// Tables written
    pub tables: usize,
    /// Records upserted
    pub records: usize,
}

/// Upsert every record of the dataset into its table.
///
/// `open_store` yields a store handle for a table name; records are
/// written unconditionally, so re-running with the same dataset is
/// idempotent.
pub async fn apply_seed<S, F>(seed: &SeedData, open_store: F) -> Result<SeedOutcome>
where
    S: InventoryStore,
    F: Fn(&str) -> S,
{
    seed.validate()?;

    let mut outcome = SeedOutcome::default();
    for (table, records) in &seed.tables {
        info!("Seeding {} records into {}", records.len(), table);
        open_store(table).seed(records).await?;
        outcome.tables += 1;
        outcome.records += records.len();
    }

    Ok(outcome)
}

/// Delivers provisioning responses to the caller-supplied URL.
pub struct CallbackClient {
    client: reqwest::Client,
}

impl CallbackClient {
    /// Create a callback client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
        })
    }

    /// PUT the response body to the callback URL.
    ///
    /// The presigned URL's signature does not cover a content-type,
    /// so the JSON body is sent raw. Anything but HTTP 200 is an
    /// error for the caller to re-raise.
    pub async fn send(&self, url: &str, response: &ProvisionResponse) -> Result<()> {
        let body = serde_json::to_string(response)?;
        let reply = self.client.put(url).body(body).send().await?;

        let status = reply.status().as_u16();
        if status != 200 {
            error!(
                "Callback rejected with HTTP {}: {}",
                status,
                reply.text().await.unwrap_or_default()
            );
            return Err(AppError::Callback { status });
        }

        info!("Provisioning callback delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::store::MemoryStore;

    const DATASET: &str = r#"
        [[tables.components]]
        component_name = "widget"
        component_url = "https://vendor.example/widget"

        [[tables.components]]
        component_name = "gadget"
        component_url = "https://vendor.example/gadget"

        [[tables.watchers]]
        component_name = "sentinel"
        component_url = "https://vendor.example/sentinel"
    "#;

    fn stores_for(seed: &SeedData) -> HashMap<String, MemoryStore> {
        seed.tables
            .keys()
            .map(|table| (table.clone(), MemoryStore::new()))
            .collect()
    }

    #[tokio::test]
    async fn seeds_every_table_in_the_dataset() {
        let seed: SeedData = toml::from_str(DATASET).unwrap();
        let stores = stores_for(&seed);

        let outcome = apply_seed(&seed, |table| stores[table].clone())
            .await
            .unwrap();

        assert_eq!(outcome.tables, 2);
        assert_eq!(outcome.records, 3);
        assert_eq!(stores["components"].len(), 2);
        assert_eq!(stores["watchers"].len(), 1);
    }

    #[tokio::test]
    async fn reseeding_yields_the_same_contents() {
        let seed: SeedData = toml::from_str(DATASET).unwrap();
        let stores = stores_for(&seed);

        apply_seed(&seed, |table| stores[table].clone())
            .await
            .unwrap();
        apply_seed(&seed, |table| stores[table].clone())
            .await
            .unwrap();

        assert_eq!(stores["components"].len(), 2);
        assert_eq!(
            stores["components"].get("widget").unwrap().url,
            "https://vendor.example/widget"
        );
    }

    #[tokio::test]
    async fn empty_dataset_is_rejected() {
        let seed = SeedData::default();
        let result = apply_seed(&seed, |_| MemoryStore::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn record_without_identifier_fails_the_seed() {
        let seed: SeedData = toml::from_str(
            r#"
            [[tables.components]]
            component_url = "https://vendor.example/widget"
            "#,
        )
        .unwrap();

        let result = apply_seed(&seed, |_| MemoryStore::new()).await;
        assert!(result.is_err());
    }
}
