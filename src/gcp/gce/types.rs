//! # Google Compute Engine (GCE) Data Types
//!
//! This module defines the Rust structs that model the JSON objects used in the
//! Google Compute Engine API: the body of an `instances.insert` request, the
//! zonal `Operation` returned by mutating calls, and the resources returned by
//! `instances.list` and `images.getFromFamily`.
//!
//! For detailed information on each field, refer to the official GCE API documentation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the request body for creating a new GCE virtual machine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRequest {
    /// The name of the instance.
    pub name: String,
    /// Partial URL of the machine type (e.g., "zones/us-west1-b/machineTypes/f1-micro").
    #[serde(rename = "machineType")]
    pub machine_type: String,
    /// The disks attached to the instance.
    pub disks: Vec<AttachedDisk>,
    /// The network interfaces for the instance.
    #[serde(rename = "networkInterfaces")]
    pub network_interfaces: Vec<NetworkInterface>,
    /// The service accounts associated with the instance.
    #[serde(rename = "serviceAccounts")]
    pub service_accounts: Vec<ServiceAccountRef>,
    /// Metadata key/value pairs available to the instance.
    pub metadata: Metadata,
}

/// An attached disk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedDisk {
    pub boot: bool,
    #[serde(rename = "autoDelete")]
    pub auto_delete: bool,
    #[serde(rename = "initializeParams")]
    pub initialize_params: InitializeParams,
}

/// Parameters for initializing a disk from a source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "sourceImage")]
    pub source_image: String,
}

/// Instance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub items: Vec<MetadataItem>,
}

impl Metadata {
    /// Value of the first item with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.as_str())
    }
}

/// A single metadata key-value pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

/// A network interface, both as requested and as reported by `instances.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(rename = "accessConfigs", default)]
    pub access_configs: Vec<AccessConfig>,
}

/// Configuration for external network access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub config_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ephemeral external address; only present in responses.
    #[serde(rename = "natIP", default, skip_serializing_if = "Option::is_none")]
    pub nat_ip: Option<String>,
}

/// A reference to a service account and its scopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAccountRef {
    pub email: String,
    pub scopes: Vec<String>,
}

/// Lifecycle of a zonal operation. Statuses this client does not know are
/// kept as `Unknown` and treated as still in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    #[default]
    Pending,
    Running,
    Done,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationStatus::Pending => "PENDING",
            OperationStatus::Running => "RUNNING",
            OperationStatus::Done => "DONE",
            OperationStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// An asynchronous provider-side task returned by insert/delete calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub status: OperationStatus,
    #[serde(rename = "operationType", default)]
    pub operation_type: Option<String>,
    #[serde(rename = "targetLink", default)]
    pub target_link: Option<String>,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(rename = "selfLink", default)]
    pub self_link: Option<String>,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(rename = "httpErrorStatusCode", default)]
    pub http_error_status_code: Option<u16>,
    #[serde(rename = "httpErrorMessage", default)]
    pub http_error_message: Option<String>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }
}

/// Error payload attached to a finished operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationErrorItem {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("unspecified error");
        }
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.code, e.message)?;
        }
        Ok(())
    }
}

/// An instance as returned by `instances.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "machineType", default)]
    pub machine_type: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(rename = "selfLink", default)]
    pub self_link: Option<String>,
    #[serde(rename = "networkInterfaces", default)]
    pub network_interfaces: Vec<NetworkInterface>,
}

impl Instance {
    /// External NAT address of the first interface, if any.
    pub fn external_ip(&self) -> Option<&str> {
        self.network_interfaces
            .first()
            .and_then(|ni| ni.access_configs.first())
            .and_then(|ac| ac.nat_ip.as_deref())
    }

    /// Machine type without the URL prefix (e.g. "f1-micro").
    pub fn machine_type_name(&self) -> Option<&str> {
        self.machine_type.as_deref().map(last_segment)
    }

    /// Zone without the URL prefix (e.g. "us-west1-b").
    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_deref().map(last_segment)
    }
}

/// One page of `instances.list`. `items` is absent when the zone is empty.
#[derive(Debug, Default, Deserialize)]
pub struct InstanceList {
    #[serde(default)]
    pub items: Option<Vec<Instance>>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

/// A boot image, as returned by `images.getFromFamily`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(rename = "selfLink")]
    pub self_link: String,
}

/// Last path segment of a resource URL.
pub fn last_segment(s: &str) -> &str {
    s.rsplit('/').next().unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_status_parses_known_and_unknown_values() {
        let op: Operation = serde_json::from_value(json!({
            "name": "operation-1",
            "status": "RUNNING",
            "progress": 40
        }))
        .unwrap();
        assert_eq!(op.status, OperationStatus::Running);
        assert!(!op.is_done());
        assert_eq!(op.progress, Some(40));

        let op: Operation =
            serde_json::from_value(json!({"name": "operation-2", "status": "ABORTING"})).unwrap();
        assert_eq!(op.status, OperationStatus::Unknown);
        assert!(!op.is_done());
    }

    #[test]
    fn done_operation_carries_error_payload() {
        let op: Operation = serde_json::from_value(json!({
            "name": "operation-3",
            "status": "DONE",
            "httpErrorStatusCode": 409,
            "error": {
                "errors": [{
                    "code": "RESOURCE_ALREADY_EXISTS",
                    "message": "The resource 'via-service-1' already exists"
                }]
            }
        }))
        .unwrap();
        assert!(op.is_done());
        assert_eq!(op.http_error_status_code, Some(409));
        let err = op.error.unwrap();
        assert_eq!(
            err.to_string(),
            "RESOURCE_ALREADY_EXISTS: The resource 'via-service-1' already exists"
        );
    }

    #[test]
    fn instance_helpers_strip_resource_urls() {
        let instance: Instance = serde_json::from_value(json!({
            "name": "via-service-1",
            "status": "RUNNING",
            "machineType": "https://www.googleapis.com/compute/v1/projects/p/zones/us-west1-b/machineTypes/f1-micro",
            "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/us-west1-b",
            "networkInterfaces": [{
                "network": "global/networks/default",
                "accessConfigs": [{"type": "ONE_TO_ONE_NAT", "name": "External NAT", "natIP": "203.0.113.7"}]
            }]
        }))
        .unwrap();
        assert_eq!(instance.machine_type_name(), Some("f1-micro"));
        assert_eq!(instance.zone_name(), Some("us-west1-b"));
        assert_eq!(instance.external_ip(), Some("203.0.113.7"));
    }

    #[test]
    fn empty_list_has_no_items() {
        let list: InstanceList =
            serde_json::from_value(json!({"kind": "compute#instanceList", "id": "x"})).unwrap();
        assert!(list.items.is_none());
        assert!(list.next_page_token.is_none());
    }
}
