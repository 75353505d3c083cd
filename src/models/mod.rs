// src/models/mod.rs

//! Domain models for the stockwatch application.
//!
//! Every external interface (inventory records, change-feed events,
//! provisioning requests, seed datasets) has an explicit typed shape
//! here, validated at the boundary.

mod component;
mod event;
mod provision;
mod seed;

// Re-export all public types
pub use component::{ATTR_AVAILABILITY, ATTR_NAME, ATTR_URL, Component};
pub use event::{
    Attribute, AttributeMap, ChangeImages, ChangeKind, ComponentState, StreamEvent, StreamRecord,
};
pub use provision::{ProvisionRequest, ProvisionResponse, ProvisionStatus, RequestType};
pub use seed::{SeedData, SeedRecord};
