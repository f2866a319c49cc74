use anyhow::{Context, Result};

use gce_provision::gcp::gce::wait_for_operation;
use gce_provision::settings::Settings;

use super::WaitArgs;
use crate::common::{compute_client, operation_spinner};

pub async fn run(settings: &Settings, operation: &str, wait: &WaitArgs) -> Result<()> {
    let client = compute_client(settings);

    let (pb, on_progress) = operation_spinner()?;
    let result = wait_for_operation(
        &client,
        settings.project(),
        &settings.zone,
        operation,
        &wait.poll_config(),
        Some(on_progress),
    )
    .await;
    if !pb.is_finished() {
        pb.finish_and_clear();
    }
    let done = result.with_context(|| format!("Operation '{}' did not complete", operation))?;

    println!(
        "Operation result: {}",
        serde_json::to_string_pretty(&done)?
    );
    Ok(())
}
