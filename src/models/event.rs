//! Change-feed event structures.
//!
//! Typed form of the table's stream records. Attribute values arrive
//! double-encoded (`{"S": string}` / `{"BOOL": bool}`), so images are
//! maps of [`Attribute`] and get decoded into [`ComponentState`] before
//! any decision is made on them.

use std::collections::HashMap;

use serde::Deserialize;

use crate::models::component::{ATTR_AVAILABILITY, ATTR_NAME};

/// A batch of change records, as delivered to the notifier.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEvent {
    /// Records in arrival order; ordered per key, not across keys
    #[serde(rename = "Records", default)]
    pub records: Vec<StreamRecord>,
}

/// A single change record: before/after images of one table item.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "eventName")]
    pub event_name: ChangeKind,

    #[serde(rename = "dynamodb", default)]
    pub change: ChangeImages,
}

/// Kind of change carried by a stream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "MODIFY")]
    Modify,
    #[serde(rename = "REMOVE")]
    Remove,
}

/// Before/after item images of a change record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeImages {
    #[serde(rename = "NewImage", default)]
    pub new_image: Option<AttributeMap>,

    #[serde(rename = "OldImage", default)]
    pub old_image: Option<AttributeMap>,
}

/// An item image: attribute name to double-encoded value.
pub type AttributeMap = HashMap<String, Attribute>;

/// A double-encoded stream attribute value.
///
/// Only the value kinds this table uses are modeled; anything else
/// deserializes to an empty attribute and decodes to nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attribute {
    #[serde(rename = "S", default)]
    pub string: Option<String>,

    #[serde(rename = "BOOL", default)]
    pub boolean: Option<bool>,

    #[serde(rename = "N", default)]
    pub number: Option<String>,
}

/// Decoded component fields of one item image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentState {
    /// Component identifier
    pub name: String,

    /// Stock flag, absent when the image carries none
    pub availability: Option<bool>,
}

impl StreamRecord {
    /// Decode the after-image, if present and carrying an identifier.
    pub fn new_state(&self) -> Option<ComponentState> {
        self.change.new_image.as_ref().and_then(decode_image)
    }

    /// Decode the before-image, if present and carrying an identifier.
    pub fn old_state(&self) -> Option<ComponentState> {
        self.change.old_image.as_ref().and_then(decode_image)
    }
}

fn decode_image(image: &AttributeMap) -> Option<ComponentState> {
    let name = image.get(ATTR_NAME)?.string.clone()?;
    let availability = image.get(ATTR_AVAILABILITY).and_then(|attr| attr.boolean);
    Some(ComponentState { name, availability })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> StreamEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_modify_record_with_both_images() {
        let event = parse(
            r#"{
                "Records": [{
                    "eventName": "MODIFY",
                    "dynamodb": {
                        "OldImage": {
                            "component_name": {"S": "widget"},
                            "component_url": {"S": "http://x/widget"},
                            "component_availability": {"BOOL": false}
                        },
                        "NewImage": {
                            "component_name": {"S": "widget"},
                            "component_url": {"S": "http://x/widget"},
                            "component_availability": {"BOOL": true}
                        }
                    }
                }]
            }"#,
        );

        assert_eq!(event.records.len(), 1);
        let record = &event.records[0];
        assert_eq!(record.event_name, ChangeKind::Modify);

        let old = record.old_state().unwrap();
        let new = record.new_state().unwrap();
        assert_eq!(old.name, "widget");
        assert_eq!(old.availability, Some(false));
        assert_eq!(new.availability, Some(true));
    }

    #[test]
    fn decodes_insert_without_old_image() {
        let event = parse(
            r#"{
                "Records": [{
                    "eventName": "INSERT",
                    "dynamodb": {
                        "NewImage": {
                            "component_name": {"S": "widget"},
                            "component_url": {"S": "http://x/widget"}
                        }
                    }
                }]
            }"#,
        );

        let record = &event.records[0];
        assert_eq!(record.event_name, ChangeKind::Insert);
        assert!(record.old_state().is_none());

        let new = record.new_state().unwrap();
        assert_eq!(new.availability, None);
    }

    #[test]
    fn remove_kind_parses() {
        let event = parse(r#"{"Records": [{"eventName": "REMOVE", "dynamodb": {}}]}"#);
        assert_eq!(event.records[0].event_name, ChangeKind::Remove);
    }

    #[test]
    fn image_without_identifier_decodes_to_none() {
        let event = parse(
            r#"{
                "Records": [{
                    "eventName": "MODIFY",
                    "dynamodb": {
                        "NewImage": {"component_availability": {"BOOL": true}}
                    }
                }]
            }"#,
        );
        assert!(event.records[0].new_state().is_none());
    }

    #[test]
    fn empty_batch_parses() {
        let event = parse(r#"{"Records": []}"#);
        assert!(event.records.is_empty());
    }
}
