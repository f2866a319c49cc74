use anyhow::{Context, Result};

use gce_provision::gcp::gce::wait_for_operation;
use gce_provision::settings::Settings;

use super::WaitArgs;
use crate::common::{compute_client, operation_spinner};

pub async fn run(settings: &Settings, instance_name: &str, wait: &WaitArgs) -> Result<()> {
    let project = settings.project();
    let zone = &settings.zone;
    let client = compute_client(settings);

    println!("Deleting instance '{}' in zone '{}'...", instance_name, zone);

    let operation = client
        .delete_instance(project, zone, instance_name)
        .await
        .with_context(|| format!("Failed to delete instance '{}'", instance_name))?;

    let (pb, on_progress) = operation_spinner()?;
    let result = wait_for_operation(
        &client,
        project,
        zone,
        &operation.name,
        &wait.poll_config(),
        Some(on_progress),
    )
    .await;
    if !pb.is_finished() {
        pb.finish_and_clear();
    }
    result.with_context(|| format!("Deletion of '{}' did not complete", instance_name))?;

    println!("Instance '{}' deleted.", instance_name);
    Ok(())
}
