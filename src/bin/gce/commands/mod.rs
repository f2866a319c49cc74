use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use gce_provision::gcp::gce::PollConfig;
use gce_provision::settings::{
    DEFAULT_BUCKET, DEFAULT_IMAGE_FAMILY, DEFAULT_IMAGE_PROJECT, DEFAULT_INSTANCE_NAME,
    DEFAULT_MACHINE_TYPE, DEFAULT_STARTUP_SCRIPT,
};

pub mod delete;
pub mod instances;
pub mod run;
pub mod wait;

/// Arguments for waiting on an operation
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Maximum time to wait in seconds
    #[arg(long, default_value = "300")]
    pub wait_timeout: u64,

    /// Initial polling interval in seconds
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,

    /// Longest polling interval in seconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_poll_interval: u64,
}

impl Default for WaitArgs {
    fn default() -> Self {
        Self {
            wait_timeout: 300,
            poll_interval: 1,
            max_poll_interval: 10,
        }
    }
}

impl WaitArgs {
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            initial_interval: Duration::from_secs(self.poll_interval),
            max_interval: Duration::from_secs(self.max_poll_interval.max(self.poll_interval)),
            timeout: Duration::from_secs(self.wait_timeout),
            ..PollConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = DEFAULT_INSTANCE_NAME)]
    pub name: String,

    #[arg(long, default_value = DEFAULT_MACHINE_TYPE)]
    pub machine_type: String,

    /// Project hosting the boot image family
    #[arg(long, default_value = DEFAULT_IMAGE_PROJECT)]
    pub image_project: String,

    #[arg(long, default_value = DEFAULT_IMAGE_FAMILY)]
    pub image_family: String,

    /// Script passed to the instance as `startup-script` metadata
    #[arg(long, default_value = DEFAULT_STARTUP_SCRIPT)]
    pub startup_script: PathBuf,

    /// Bucket the startup script uploads its output to
    #[arg(long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    #[command(flatten)]
    pub wait: WaitArgs,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            name: DEFAULT_INSTANCE_NAME.to_string(),
            machine_type: DEFAULT_MACHINE_TYPE.to_string(),
            image_project: DEFAULT_IMAGE_PROJECT.to_string(),
            image_family: DEFAULT_IMAGE_FAMILY.to_string(),
            startup_script: PathBuf::from(DEFAULT_STARTUP_SCRIPT),
            bucket: DEFAULT_BUCKET.to_string(),
            wait: WaitArgs::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct WaitCli {
        #[command(flatten)]
        wait: WaitArgs,
    }

    fn parse(args: &[&str]) -> Result<WaitArgs, clap::Error> {
        let argv = std::iter::once("gce").chain(args.iter().copied());
        WaitCli::try_parse_from(argv).map(|cli| cli.wait)
    }

    #[test]
    fn defaults_match_poll_config_defaults() {
        let config = parse(&[]).unwrap().poll_config();
        let expected = PollConfig::default();
        assert_eq!(config.initial_interval, expected.initial_interval);
        assert_eq!(config.max_interval, expected.max_interval);
        assert_eq!(config.timeout, expected.timeout);
        assert_eq!(config.max_transient_errors, expected.max_transient_errors);
        assert_eq!(
            WaitArgs::default().poll_config().timeout,
            Duration::from_secs(300)
        );
    }

    #[test]
    fn flags_map_to_poll_config() {
        let config = parse(&[
            "--wait-timeout",
            "60",
            "--poll-interval",
            "2",
            "--max-poll-interval",
            "5",
        ])
        .unwrap()
        .poll_config();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.initial_interval, Duration::from_secs(2));
        assert_eq!(config.max_interval, Duration::from_secs(5));
    }

    #[test]
    fn max_interval_never_below_initial() {
        let config = parse(&["--poll-interval", "30", "--max-poll-interval", "5"])
            .unwrap()
            .poll_config();
        assert_eq!(config.initial_interval, Duration::from_secs(30));
        assert_eq!(config.max_interval, Duration::from_secs(30));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        assert!(parse(&["--poll-interval", "0"]).is_err());
        assert!(parse(&["--max-poll-interval", "0"]).is_err());
    }
}
