//! # GCE Instance Default Configurations
//!
//! This module turns an `InstanceConfig` into the `InstanceRequest` body of an
//! `instances.insert` call. The builder performs no validation: a malformed
//! zone or image is reported by the API, not here.

use crate::gcp::gce::types::*;

/// Picture the startup script serves by default.
pub const DEFAULT_IMAGE_URL: &str = "http://storage.googleapis.com/gce-demo-input/photo.jpg";
/// Caption rendered over the picture.
pub const DEFAULT_IMAGE_CAPTION: &str = "Ready for dessert?";
pub const DEFAULT_NETWORK: &str = "global/networks/default";
/// The project's default compute service account.
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// Scopes granted to the instance's service account.
pub const DEFAULT_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/devstorage.read_write",
    "https://www.googleapis.com/auth/logging.write",
    "https://www.googleapis.com/auth/cloud-platform",
];

/// Everything needed to describe a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceConfig {
    pub name: String,
    pub zone: String,
    /// Short machine type name (e.g. "f1-micro").
    pub machine_type: String,
    /// Self-link of the boot disk image.
    pub source_image: String,
    pub startup_script: String,
    pub bucket: String,
    pub image_url: String,
    pub image_caption: String,
    pub network: String,
    pub service_account_email: String,
    pub scopes: Vec<String>,
}

impl InstanceConfig {
    /// A config with the stock machine type, network, service account and
    /// metadata strings.
    pub fn new(
        name: &str,
        zone: &str,
        source_image: &str,
        startup_script: &str,
        bucket: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            zone: zone.to_string(),
            machine_type: crate::settings::DEFAULT_MACHINE_TYPE.to_string(),
            source_image: source_image.to_string(),
            startup_script: startup_script.to_string(),
            bucket: bucket.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            image_caption: DEFAULT_IMAGE_CAPTION.to_string(),
            network: DEFAULT_NETWORK.to_string(),
            service_account_email: DEFAULT_SERVICE_ACCOUNT.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_machine_type(mut self, machine_type: &str) -> Self {
        self.machine_type = machine_type.to_string();
        self
    }

    /// Builds the insert request body.
    ///
    /// The instance boots from a single persistent disk that is deleted with
    /// the instance, gets an ephemeral external address, and receives the
    /// startup script, picture URL, caption and bucket as metadata.
    pub fn to_request(&self) -> InstanceRequest {
        InstanceRequest {
            name: self.name.clone(),
            machine_type: format!("zones/{}/machineTypes/{}", self.zone, self.machine_type),
            disks: vec![AttachedDisk {
                boot: true,
                auto_delete: true,
                initialize_params: InitializeParams {
                    source_image: self.source_image.clone(),
                },
            }],
            network_interfaces: vec![NetworkInterface {
                network: Some(self.network.clone()),
                access_configs: vec![AccessConfig {
                    config_type: Some("ONE_TO_ONE_NAT".to_string()),
                    name: Some("External NAT".to_string()),
                    nat_ip: None,
                }],
            }],
            service_accounts: vec![ServiceAccountRef {
                email: self.service_account_email.clone(),
                scopes: self.scopes.clone(),
            }],
            metadata: Metadata {
                items: vec![
                    metadata_item("startup-script", &self.startup_script),
                    metadata_item("url", &self.image_url),
                    metadata_item("text", &self.image_caption),
                    metadata_item("bucket", &self.bucket),
                ],
            },
        }
    }
}

fn metadata_item(key: &str, value: &str) -> MetadataItem {
    MetadataItem {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Creates an `InstanceRequest` with the stock settings.
///
/// # Arguments
/// * `name` - The name for the new instance.
/// * `zone` - The zone for the instance (e.g., "us-west1-b").
/// * `source_image` - Self-link of the boot image.
/// * `startup_script` - Shell script run by the guest on boot.
/// * `bucket` - Storage bucket the startup script writes to.
pub fn create_instance_request(
    name: &str,
    zone: &str,
    source_image: &str,
    startup_script: &str,
    bucket: &str,
) -> InstanceRequest {
    InstanceConfig::new(name, zone, source_image, startup_script, bucket).to_request()
}
