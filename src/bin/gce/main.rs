use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gce_provision::settings::Settings;

use crate::commands::{RunArgs, WaitArgs};

#[derive(Parser, Debug)]
#[command(
    name = "gce",
    about = "Compute Engine utilities: run/instances/delete/wait"
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Defaults to `run` with the stock instance.
    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an instance, wait for it, then list the zone's instances
    Run(RunArgs),

    /// List instances in a zone
    Instances,

    /// Delete an instance and wait for the deletion to finish
    Delete {
        #[arg(name = "INSTANCE_NAME")]
        name: String,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Wait for an existing zonal operation to finish
    Wait {
        #[arg(name = "OPERATION")]
        operation: String,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => commands::run::run(&cli.settings, &args).await,
        Commands::Instances => commands::instances::run(&cli.settings).await,
        Commands::Delete { name, wait } => {
            commands::delete::run(&cli.settings, &name, &wait).await
        }
        Commands::Wait { operation, wait } => {
            commands::wait::run(&cli.settings, &operation, &wait).await
        }
    }
}

mod commands;
mod common;

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn settings_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["gce", "instances", "--zone", "us-east1-b"]).unwrap();
        assert!(matches!(cli.cmd, Some(Commands::Instances)));
        assert_eq!(cli.settings.zone, "us-east1-b");

        let cli = Cli::try_parse_from(["gce", "--project", "p-1", "wait", "op-1"]).unwrap();
        assert_eq!(cli.settings.project(), "p-1");
        assert!(matches!(cli.cmd, Some(Commands::Wait { ref operation, .. }) if operation == "op-1"));
    }

    #[test]
    fn no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["gce"]).unwrap();
        assert!(cli.cmd.is_none());
        assert_eq!(cli.settings.zone, gce_provision::settings::DEFAULT_ZONE);
    }
}
