//! Provisioning request/response structures.
//!
//! Wire shapes of the custom-resource contract: the provisioning
//! system invokes the seeder with a request and expects exactly one
//! structured response delivered to `ResponseURL`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Operation requested by the provisioning system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Incoming provisioning request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionRequest {
    pub request_type: RequestType,

    /// Presigned URL the response must be PUT to
    #[serde(rename = "ResponseURL")]
    pub response_url: String,

    pub stack_id: String,

    pub request_id: String,

    pub logical_resource_id: String,

    /// Present on Update/Delete for an existing resource
    #[serde(default)]
    pub physical_resource_id: Option<String>,
}

/// Outcome reported back to the provisioning system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProvisionStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Response body delivered to the callback URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionResponse {
    pub status: ProvisionStatus,

    pub reason: String,

    pub physical_resource_id: String,

    pub stack_id: String,

    pub request_id: String,

    pub logical_resource_id: String,

    pub data: BTreeMap<String, String>,
}

impl ProvisionResponse {
    /// Build a success response echoing the request's identifiers.
    pub fn success(
        request: &ProvisionRequest,
        physical_resource_id: impl Into<String>,
        reason: impl Into<String>,
        data: BTreeMap<String, String>,
    ) -> Self {
        Self {
            status: ProvisionStatus::Success,
            reason: reason.into(),
            physical_resource_id: physical_resource_id.into(),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            data,
        }
    }

    /// Build a failure response; the reason surfaces in the
    /// provisioning console.
    pub fn failure(
        request: &ProvisionRequest,
        physical_resource_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            status: ProvisionStatus::Failed,
            reason: reason.into(),
            physical_resource_id: physical_resource_id.into(),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            data: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request(kind: &str) -> ProvisionRequest {
        let json = format!(
            r#"{{
                "RequestType": "{kind}",
                "ResponseURL": "https://callback.example/resp",
                "StackId": "arn:aws:cloudformation:stack/demo",
                "RequestId": "req-1",
                "LogicalResourceId": "TableSeed"
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn parses_create_request() {
        let request = sample_request("Create");
        assert_eq!(request.request_type, RequestType::Create);
        assert_eq!(request.response_url, "https://callback.example/resp");
        assert!(request.physical_resource_id.is_none());
    }

    #[test]
    fn parses_delete_request() {
        let request = sample_request("Delete");
        assert_eq!(request.request_type, RequestType::Delete);
    }

    #[test]
    fn success_response_serializes_with_wire_field_names() {
        let request = sample_request("Update");
        let mut data = BTreeMap::new();
        data.insert("SeededRecords".to_string(), "3".to_string());

        let response = ProvisionResponse::success(&request, "stream-1", "Seed applied", data);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["Status"], "SUCCESS");
        assert_eq!(json["PhysicalResourceId"], "stream-1");
        assert_eq!(json["StackId"], "arn:aws:cloudformation:stack/demo");
        assert_eq!(json["RequestId"], "req-1");
        assert_eq!(json["LogicalResourceId"], "TableSeed");
        assert_eq!(json["Data"]["SeededRecords"], "3");
    }

    #[test]
    fn failure_response_carries_reason() {
        let request = sample_request("Create");
        let response = ProvisionResponse::failure(&request, "stream-1", "seed file missing");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["Status"], "FAILED");
        assert_eq!(json["Reason"], "seed file missing");
    }
}
