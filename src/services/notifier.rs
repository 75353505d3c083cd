//! Restock notification service.
//!
//! Consumes change records from the inventory table's feed and
//! publishes a notification on every false-to-true availability
//! transition. Delivery is at-least-once upstream, so duplicate
//! notifications are possible and tolerated; no deduplication here.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{ATTR_NAME, ChangeKind, StreamEvent, StreamRecord};

/// A restock notification for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Component identifier, also carried as a structured attribute
    /// for downstream filtering
    pub component: String,

    /// Human-readable subject
    pub subject: String,

    /// Human-readable body
    pub message: String,
}

impl Notification {
    /// Compose the restock notification for a component.
    pub fn restock(name: &str) -> Self {
        Self {
            component: name.to_string(),
            subject: name.to_string(),
            message: format!("Component {name} is in stock!"),
        }
    }
}

/// Decide whether a change record warrants a notification.
///
/// Notifies only on an update whose before-image carried an
/// availability flag of false and whose after-image carries true.
/// A record with no prior recorded flag never notifies.
pub fn evaluate(record: &StreamRecord) -> Option<Notification> {
    if record.event_name != ChangeKind::Modify {
        return None;
    }

    let old = record.old_state()?;
    let new = record.new_state()?;

    let was_available = old.availability?;
    let is_available = new.availability?;

    if was_available || !is_available {
        return None;
    }

    Some(Notification::restock(&new.name))
}

/// Summary of one notifier invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyOutcome {
    /// Change records received
    pub records: usize,
    /// Notifications published
    pub published: usize,
}

/// Trait for notification channel backends.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Publish one notification to the external topic.
    async fn publish(&self, notification: &Notification) -> Result<()>;
}

/// Evaluate every record of a batch and publish the matches.
///
/// Publish failures propagate so the platform redelivers the batch.
pub async fn process_event(
    event: &StreamEvent,
    channel: &dyn NotificationChannel,
) -> Result<NotifyOutcome> {
    let mut outcome = NotifyOutcome {
        records: event.records.len(),
        ..NotifyOutcome::default()
    };

    for record in &event.records {
        if record.event_name == ChangeKind::Modify
            && (record.old_state().is_none() || record.new_state().is_none())
        {
            warn!("Skipping malformed change record (missing image or {})", ATTR_NAME);
            continue;
        }

        if let Some(notification) = evaluate(record) {
            info!("Component {} is back in stock, notifying", notification.component);
            channel.publish(&notification).await?;
            outcome.published += 1;
        }
    }

    Ok(outcome)
}

#[cfg(feature = "aws")]
pub use sns::SnsChannel;

#[cfg(feature = "aws")]
mod sns {
    use aws_sdk_sns::Client;
    use aws_sdk_sns::types::MessageAttributeValue;

    use super::*;
    use crate::config::NotifierConfig;
    use crate::error::AppError;

    /// SNS-backed notification channel.
    #[derive(Debug, Clone)]
    pub struct SnsChannel {
        client: Client,
        topic_arn: String,
    }

    impl SnsChannel {
        /// Create a channel for an existing topic.
        pub fn new(client: Client, config: &NotifierConfig) -> Self {
            Self {
                client,
                topic_arn: config.topic_arn.clone(),
            }
        }

        /// Create a channel using the default AWS environment
        /// configuration.
        pub async fn connect(config: &NotifierConfig) -> Self {
            let sdk_config =
                aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Self::new(Client::new(&sdk_config), config)
        }
    }

    #[async_trait]
    impl NotificationChannel for SnsChannel {
        async fn publish(&self, notification: &Notification) -> Result<()> {
            let attribute = MessageAttributeValue::builder()
                .data_type("String")
                .string_value(&notification.component)
                .build()
                .map_err(AppError::publish)?;

            self.client
                .publish()
                .topic_arn(&self.topic_arn)
                .message(&notification.message)
                .subject(&notification.subject)
                .message_attributes(ATTR_NAME, attribute)
                .send()
                .await
                .map_err(|e| AppError::publish(e.into_service_error()))?;

            Ok(())
        }
    }
}
