use serde::{Deserialize, Serialize};

// Generic GCP types shared across services (service-agnostic).

/// The default OAuth2 token endpoint, used when a key file omits `token_uri`.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// A service account key file as downloaded from the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccount {
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    TOKEN_URL.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_uri_defaults_when_missing() {
        let sa: ServiceAccount = serde_json::from_str(
            r#"{"client_email": "svc@p.iam.gserviceaccount.com", "private_key": "pem"}"#,
        )
        .unwrap();
        assert_eq!(sa.token_uri, TOKEN_URL);
        assert_eq!(sa.client_email, "svc@p.iam.gserviceaccount.com");
        assert!(sa.project_id.is_empty());
    }
}
