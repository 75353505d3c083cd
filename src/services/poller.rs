//! Availability polling service.
//!
//! Loads every component from the inventory store, fetches each
//! vendor page, derives the in-stock flag from the product
//! availability meta tag, and writes the flag back. Failures are
//! per-component: one bad page never aborts the batch.

use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::config::HttpConfig;
use crate::error::{AppError, Result};
use crate::services::fetch::{HttpFetcher, PageFetcher};
use crate::store::InventoryStore;

/// Meta tag the vendor pages expose their stock state through.
const AVAILABILITY_SELECTOR: &str = r#"meta[property="product:availability"]"#;

/// Exact content value meaning "in stock".
const IN_STOCK_MARKER: &str = "instock";

/// Summary of a polling pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct PollOutcome {
    /// Components loaded from the store
    pub polled: usize,
    /// Flags written back
    pub updated: usize,
    /// Components skipped after a fetch, parse, or write failure
    pub failed: usize,
}

/// Service polling vendor pages for component availability.
pub struct AvailabilityPoller {
    fetcher: Box<dyn PageFetcher>,
}

impl AvailabilityPoller {
    /// Create a poller over an arbitrary fetcher backend.
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Create a poller fetching over HTTP.
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self::new(Box::new(HttpFetcher::new(config)?)))
    }

    /// Poll every component once, sequentially, and write the derived
    /// flags back to the store.
    pub async fn poll_all(&self, store: &dyn InventoryStore) -> Result<PollOutcome> {
        let components = store.get_all().await?;

        info!("Refreshing inventory for {} components", components.len());

        let mut outcome = PollOutcome {
            polled: components.len(),
            ..PollOutcome::default()
        };

        for component in components {
            let body = match self.fetcher.fetch(&component.url).await {
                Ok(body) => body,
                Err(error) => {
                    outcome.failed += 1;
                    warn!("Failed to fetch {} ({}): {}", component.name, component.url, error);
                    continue;
                }
            };

            let available = match parse_availability(&body) {
                Ok(available) => available,
                Err(error) => {
                    outcome.failed += 1;
                    warn!("Failed to parse page for {}: {}", component.name, error);
                    continue;
                }
            };

            info!("Setting {} availability to {}", component.name, available);
            match store.update_availability(&component.name, available).await {
                Ok(()) => outcome.updated += 1,
                Err(error) => {
                    outcome.failed += 1;
                    warn!("Failed to update {}: {}", component.name, error);
                }
            }
        }

        Ok(outcome)
    }
}

/// Derive the in-stock flag from a product page body.
///
/// True only on an exact marker match; a missing tag or attribute, or
/// any other value, means out of stock.
pub fn parse_availability(html: &str) -> Result<bool> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(AVAILABILITY_SELECTOR)
        .map_err(|e| AppError::selector(AVAILABILITY_SELECTOR, format!("{e:?}")))?;

    Ok(document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content == IN_STOCK_MARKER)
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::{ATTR_NAME, ATTR_URL, SeedRecord};
    use crate::services::notifier::evaluate;
    use crate::store::MemoryStore;

    fn page(content: &str) -> String {
        format!(
            r#"<html><head>
                <meta property="product:availability" content="{content}">
            </head><body></body></html>"#
        )
    }

    /// Fetcher serving canned responses per URL.
    #[derive(Default)]
    struct StaticFetcher {
        pages: Mutex<HashMap<String, std::result::Result<String, u16>>>,
    }

    impl StaticFetcher {
        fn serve(&self, url: &str, body: &str) {
            self.pages
                .lock()
                .unwrap()
                .insert(url.to_string(), Ok(body.to_string()));
        }

        fn fail(&self, url: &str, status: u16) {
            self.pages
                .lock()
                .unwrap()
                .insert(url.to_string(), Err(status));
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            match self.pages.lock().unwrap().get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(AppError::fetch(url, *status)),
                None => Err(AppError::fetch(url, 404)),
            }
        }
    }

    fn record(name: &str, url: &str) -> SeedRecord {
        let mut record = SeedRecord::new();
        record.insert(ATTR_NAME.to_string(), toml::Value::String(name.to_string()));
        record.insert(ATTR_URL.to_string(), toml::Value::String(url.to_string()));
        record
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .seed(&[record("widget", "http://x/widget")])
            .await
            .unwrap();
        store
    }

    #[test]
    fn in_stock_marker_parses_true() {
        assert!(parse_availability(&page("instock")).unwrap());
    }

    #[test]
    fn other_marker_parses_false() {
        assert!(!parse_availability(&page("oos")).unwrap());
        assert!(!parse_availability(&page("INSTOCK")).unwrap());
        assert!(!parse_availability(&page("instock ")).unwrap());
    }

    #[test]
    fn missing_meta_tag_parses_false() {
        assert!(!parse_availability("<html><head></head></html>").unwrap());
    }

    #[test]
    fn meta_tag_without_content_parses_false() {
        let html = r#"<html><head><meta property="product:availability"></head></html>"#;
        assert!(!parse_availability(html).unwrap());
    }

    #[tokio::test]
    async fn poll_writes_derived_flag() {
        let store = seeded_store().await;
        let fetcher = StaticFetcher::default();
        fetcher.serve("http://x/widget", &page("instock"));

        let poller = AvailabilityPoller::new(Box::new(fetcher));
        let outcome = poller.poll_all(&store).await.unwrap();

        assert_eq!(outcome.polled, 1);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.failed, 0);
        assert_eq!(store.get("widget").unwrap().availability, Some(true));
    }

    #[tokio::test]
    async fn fetch_failure_leaves_flag_unchanged() {
        let store = seeded_store().await;
        store.update_availability("widget", true).await.unwrap();

        let fetcher = StaticFetcher::default();
        fetcher.fail("http://x/widget", 503);

        let poller = AvailabilityPoller::new(Box::new(fetcher));
        let outcome = poller.poll_all(&store).await.unwrap();

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.updated, 0);
        assert_eq!(store.get("widget").unwrap().availability, Some(true));
    }

    #[tokio::test]
    async fn one_bad_page_does_not_abort_the_batch() {
        let store = MemoryStore::new();
        store
            .seed(&[
                record("widget", "http://x/widget"),
                record("gadget", "http://x/gadget"),
            ])
            .await
            .unwrap();

        let fetcher = StaticFetcher::default();
        fetcher.fail("http://x/gadget", 500);
        fetcher.serve("http://x/widget", &page("instock"));

        let poller = AvailabilityPoller::new(Box::new(fetcher));
        let outcome = poller.poll_all(&store).await.unwrap();

        assert_eq!(outcome.polled, 2);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(store.get("widget").unwrap().availability, Some(true));
        assert_eq!(store.get("gadget").unwrap().availability, None);
    }

    /// Full restock flow: seed, first poll with the tag absent, then a
    /// restocked poll whose change record triggers the notification.
    #[tokio::test]
    async fn restock_flow_emits_one_notification() {
        let store = seeded_store().await;
        let fetcher = StaticFetcher::default();

        // First poll: page has no availability tag yet.
        fetcher.serve("http://x/widget", "<html><head></head></html>");
        let poller = AvailabilityPoller::new(Box::new(fetcher));
        poller.poll_all(&store).await.unwrap();
        let before = store.get("widget").unwrap();
        assert_eq!(before.availability, Some(false));

        // Vendor restocks; second poll flips the flag.
        let fetcher = StaticFetcher::default();
        fetcher.serve("http://x/widget", &page("instock"));
        let poller = AvailabilityPoller::new(Box::new(fetcher));
        poller.poll_all(&store).await.unwrap();
        let after = store.get("widget").unwrap();
        assert_eq!(after.availability, Some(true));

        // The table's change feed would deliver this transition.
        let json = r#"{
            "eventName": "MODIFY",
            "dynamodb": {
                "OldImage": {
                    "component_name": {"S": "widget"},
                    "component_availability": {"BOOL": false}
                },
                "NewImage": {
                    "component_name": {"S": "widget"},
                    "component_availability": {"BOOL": true}
                }
            }
        }"#;
        let change: crate::models::StreamRecord = serde_json::from_str(json).unwrap();

        let notification = evaluate(&change).expect("restock must notify");
        assert_eq!(notification.subject, "widget");
        assert_eq!(notification.component, "widget");
        assert!(notification.message.contains("widget"));
    }
}
