use anyhow::{Context, Result};

use gce_provision::settings::Settings;

use crate::common::{compute_client, print_table};

pub async fn run(settings: &Settings) -> Result<()> {
    let zone = &settings.zone;
    let instances = compute_client(settings)
        .list_instances(settings.project(), zone)
        .await
        .context("Failed to list instances")?;

    let rows: Vec<Vec<String>> = instances
        .iter()
        .map(|it| {
            vec![
                it.status.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
                it.name.clone(),
                it.machine_type_name().unwrap_or("").to_string(),
                it.zone_name().unwrap_or(zone).to_string(),
                it.external_ip().unwrap_or("-").to_string(),
            ]
        })
        .collect();

    print_table(
        &["Status", "Name", "Machine Type", "Zone", "External IP"],
        &rows,
    );
    Ok(())
}
