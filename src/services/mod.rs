//! Service layer for the stockwatch application.
//!
//! This module contains the business logic for:
//! - Vendor page fetching (`PageFetcher` / `HttpFetcher`)
//! - Availability polling (`AvailabilityPoller`)
//! - Restock notification (`evaluate` / `NotificationChannel`)
//! - Provisioning-time seeding (`apply_seed` / `CallbackClient`)

mod fetch;
mod notifier;
mod poller;
mod seeder;

pub use fetch::{HttpFetcher, PageFetcher};
#[cfg(feature = "aws")]
pub use notifier::SnsChannel;
pub use notifier::{Notification, NotificationChannel, NotifyOutcome, evaluate, process_event};
pub use poller::{AvailabilityPoller, PollOutcome, parse_availability};
pub use seeder::{CallbackClient, SeedOutcome, apply_seed};
