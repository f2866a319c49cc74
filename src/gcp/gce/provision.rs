//! The create-wait-list flow: provision one instance and report what the zone
//! contains afterwards.

use std::path::PathBuf;

use crate::gcp::error::{ComputeError, Result};
use crate::gcp::gce::client::ComputeClient;
use crate::gcp::gce::defaults::InstanceConfig;
use crate::gcp::gce::operation::{PollConfig, ProgressCallback, wait_for_operation};
use crate::gcp::gce::types::{Instance, Operation};
use crate::settings;

/// What to create and where.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub project: String,
    pub zone: String,
    pub instance_name: String,
    pub machine_type: String,
    pub image_project: String,
    pub image_family: String,
    pub startup_script: PathBuf,
    pub bucket: String,
}

impl Default for ProvisionPlan {
    fn default() -> Self {
        Self {
            project: settings::DEFAULT_PROJECT.to_string(),
            zone: settings::DEFAULT_ZONE.to_string(),
            instance_name: settings::DEFAULT_INSTANCE_NAME.to_string(),
            machine_type: settings::DEFAULT_MACHINE_TYPE.to_string(),
            image_project: settings::DEFAULT_IMAGE_PROJECT.to_string(),
            image_family: settings::DEFAULT_IMAGE_FAMILY.to_string(),
            startup_script: PathBuf::from(settings::DEFAULT_STARTUP_SCRIPT),
            bucket: settings::DEFAULT_BUCKET.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ProvisionOutcome {
    /// The finished insert operation.
    pub operation: Operation,
    /// Instances in the zone after the insert completed.
    pub instances: Vec<Instance>,
}

/// Creates the planned instance, waits for it, then lists the zone.
///
/// Nothing is rolled back on failure: if the operation fails after the
/// provider accepted the insert, whatever it created stays in place.
pub async fn provision(
    client: &ComputeClient,
    plan: &ProvisionPlan,
    poll: &PollConfig,
    on_progress: Option<ProgressCallback>,
) -> Result<ProvisionOutcome> {
    let startup_script = tokio::fs::read_to_string(&plan.startup_script)
        .await
        .map_err(|source| ComputeError::Io {
            path: plan.startup_script.clone(),
            source,
        })?;

    let image = client
        .get_image_from_family(&plan.image_project, &plan.image_family)
        .await?;

    let request = InstanceConfig::new(
        &plan.instance_name,
        &plan.zone,
        &image.self_link,
        &startup_script,
        &plan.bucket,
    )
    .with_machine_type(&plan.machine_type)
    .to_request();

    let operation = client
        .insert_instance(&plan.project, &plan.zone, &request)
        .await?;
    let operation = wait_for_operation(
        client,
        &plan.project,
        &plan.zone,
        &operation.name,
        poll,
        on_progress,
    )
    .await?;

    let instances = client.list_instances(&plan.project, &plan.zone).await?;
    Ok(ProvisionOutcome {
        operation,
        instances,
    })
}
