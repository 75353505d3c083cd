//! Inventory store abstractions.
//!
//! One table keyed by component identifier, with two backends behind
//! the same trait: [`DynamoStore`] for the deployed table and
//! [`MemoryStore`] for local runs and tests.

#[cfg(feature = "aws")]
pub mod dynamo;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Component, SeedRecord};

// Re-export for convenience
#[cfg(feature = "aws")]
pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// Trait for inventory table backends.
///
/// Lookup is exact-match on the component identifier; `get_all` makes
/// no ordering guarantee.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Load every component record in the table.
    async fn get_all(&self) -> Result<Vec<Component>>;

    /// Write the stock flag for one component.
    async fn update_availability(&self, name: &str, available: bool) -> Result<()>;

    /// Upsert every record into the table, keyed by identifier.
    async fn seed(&self, records: &[SeedRecord]) -> Result<()>;
}
