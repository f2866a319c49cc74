//! # Settings
//!
//! Connection settings shared by every `gce` subcommand. Each field can be set
//! by a flag or an environment variable and falls back to the constants the
//! provisioning flow has always used.

use std::path::PathBuf;

use clap::Args;

pub const DEFAULT_PROJECT: &str = "dc-99999";
pub const DEFAULT_ZONE: &str = "us-west1-b";
pub const DEFAULT_CREDENTIALS: &str = "service-credentials.json";
pub const DEFAULT_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

pub const DEFAULT_INSTANCE_NAME: &str = "via-service-1";
pub const DEFAULT_BUCKET: &str = "dc-sitesh";
pub const DEFAULT_MACHINE_TYPE: &str = "f1-micro";
pub const DEFAULT_IMAGE_PROJECT: &str = "ubuntu-os-cloud";
pub const DEFAULT_IMAGE_FAMILY: &str = "ubuntu-1804-lts";
pub const DEFAULT_STARTUP_SCRIPT: &str = "startup-script.sh";

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Project that owns the instances
    #[arg(long, global = true, env = "GOOGLE_CLOUD_PROJECT", default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Zone to create and list instances in
    #[arg(long, global = true, default_value = DEFAULT_ZONE)]
    pub zone: String,

    /// Service account key file used to obtain access tokens
    #[arg(long, global = true, env = "GOOGLE_APPLICATION_CREDENTIALS", default_value = DEFAULT_CREDENTIALS)]
    pub credentials: PathBuf,

    /// Pre-issued bearer token; skips the service account exchange when set
    #[arg(long, global = true, env = "GCE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Compute API root, overridable for emulators
    #[arg(long, global = true, env = "GCE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            zone: DEFAULT_ZONE.to_string(),
            credentials: PathBuf::from(DEFAULT_CREDENTIALS),
            access_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Settings {
    /// The configured project, or the default when the variable is set but blank.
    pub fn project(&self) -> &str {
        let project = self.project.trim();
        if project.is_empty() {
            DEFAULT_PROJECT
        } else {
            project
        }
    }

    /// Chooses how API calls are authorized: a static token if one was given,
    /// otherwise the service account key file.
    #[cfg(all(feature = "reqwest", feature = "tokio"))]
    pub fn token_source(&self) -> crate::gcp::auth::TokenSource {
        use crate::gcp::auth::TokenSource;

        match self.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => TokenSource::Static(token.to_string()),
            _ => TokenSource::ServiceAccountFile(self.credentials.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_project_falls_back_to_default() {
        let settings = Settings {
            project: "   ".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.project(), DEFAULT_PROJECT);

        let settings = Settings {
            project: " my-project ".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.project(), "my-project");
    }

    #[cfg(all(feature = "reqwest", feature = "tokio"))]
    #[test]
    fn static_token_wins_over_credentials_file() {
        use crate::gcp::auth::TokenSource;

        let settings = Settings {
            access_token: Some("ya29.static".to_string()),
            ..Settings::default()
        };
        assert!(matches!(
            settings.token_source(),
            TokenSource::Static(ref t) if t == "ya29.static"
        ));

        let settings = Settings {
            access_token: Some("  ".to_string()),
            ..Settings::default()
        };
        assert!(matches!(
            settings.token_source(),
            TokenSource::ServiceAccountFile(ref p) if p == &PathBuf::from(DEFAULT_CREDENTIALS)
        ));
    }
}
