use anyhow::{Context, Result};

use gce_provision::gcp::gce::{ProvisionPlan, provision};
use gce_provision::settings::Settings;

use super::RunArgs;
use crate::common::{compute_client, operation_spinner};

pub async fn run(settings: &Settings, args: &RunArgs) -> Result<()> {
    let project = settings.project();
    let zone = &settings.zone;
    let client = compute_client(settings);

    let plan = ProvisionPlan {
        project: project.to_string(),
        zone: zone.clone(),
        instance_name: args.name.clone(),
        machine_type: args.machine_type.clone(),
        image_project: args.image_project.clone(),
        image_family: args.image_family.clone(),
        startup_script: args.startup_script.clone(),
        bucket: args.bucket.clone(),
    };

    println!("Creating instance.");

    let (pb, on_progress) = operation_spinner()?;
    pb.set_message(format!("Creating instance '{}'", args.name));
    let outcome = provision(&client, &plan, &args.wait.poll_config(), Some(on_progress))
        .await
        .with_context(|| format!("Failed to provision instance '{}'", args.name));
    if !pb.is_finished() {
        pb.finish_and_clear();
    }
    let outcome = outcome?;

    println!("Instances in project {} and zone {}:", project, zone);
    for instance in &outcome.instances {
        println!(" - {}", instance.name);
    }
    Ok(())
}
