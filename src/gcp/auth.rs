//! # GCP Authentication
//!
//! This module handles authentication with Google Cloud Platform using the
//! OAuth 2.0 flow for service accounts. It provides the `TokenSource` used by
//! the Compute client to authorize each request.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cached::proc_macro::cached;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::client::CLIENT;
use crate::gcp::error::{ComputeError, Result};
use crate::gcp::types::{AccessToken, ServiceAccount};

/// Scope requested for every token; covers the Compute API.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Lifetime requested for the signed assertion and the resulting token.
const TOKEN_LIFETIME_SECS: u64 = 3600;

/// Represents the claims in the JSON Web Token (JWT) used for authentication.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The issuer of the token (the service account's email address).
    iss: String,
    /// The scope of the requested permissions.
    scope: String,
    /// The audience for the token (the token endpoint URL).
    aud: String,
    /// The expiration time of the token (Unix timestamp).
    exp: u64,
    /// The time the token was issued (Unix timestamp).
    iat: u64,
}

/// Where bearer tokens come from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// A token obtained elsewhere (e.g. `gcloud auth print-access-token`).
    Static(String),
    /// A service account key file exchanged for a token on first use.
    ServiceAccountFile(PathBuf),
}

impl TokenSource {
    /// Returns a bearer token, fetching and caching one if needed.
    pub async fn token(&self) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccountFile(path) => service_account_token(path).await,
        }
    }
}

impl ServiceAccount {
    /// Reads and parses a service account key file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ComputeError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Token for the key file at `path`, cached per path for 50 minutes so a
/// reused token never expires mid-flow.
#[cached(
    time = 3000,
    result = true,
    key = "PathBuf",
    convert = r#"{ path.to_path_buf() }"#
)]
async fn service_account_token(path: &Path) -> std::result::Result<String, ComputeError> {
    let service_account = ServiceAccount::from_file(path).await?;
    let token = fetch_access_token(&CLIENT, &service_account).await?;
    tracing::debug!(
        client_email = %service_account.client_email,
        expires_in = token.expires_in,
        "obtained access token"
    );
    Ok(token.access_token)
}

/// Exchanges a signed assertion for an access token.
///
/// This performs the server-to-server OAuth 2.0 flow:
/// 1. Creates a JWT with claims asserting the service account's identity and
///    the requested API scope.
/// 2. Signs the JWT using the service account's private key (RS256).
/// 3. Sends the signed JWT to the account's token endpoint.
/// 4. Receives an access token in exchange.
pub async fn fetch_access_token(
    http: &reqwest::Client,
    service_account: &ServiceAccount,
) -> Result<AccessToken> {
    let jwt = sign_assertion(service_account)?;

    let params = [
        ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
        ("assertion", jwt.as_str()),
    ];

    let response = http
        .post(&service_account.token_uri)
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(ComputeError::Auth(format!(
            "token endpoint returned {}: {}",
            status, error_text
        )));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn sign_assertion(service_account: &ServiceAccount) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ComputeError::Auth(format!("system clock before Unix epoch: {}", e)))?
        .as_secs();

    let claims = Claims {
        iss: service_account.client_email.clone(),
        scope: CLOUD_PLATFORM_SCOPE.to_string(),
        aud: service_account.token_uri.clone(),
        exp: now + TOKEN_LIFETIME_SECS,
        iat: now,
    };

    let mut header = Header::new(Algorithm::RS256);
    if !service_account.private_key_id.is_empty() {
        header.kid = Some(service_account.private_key_id.clone());
    }
    let encoding_key = EncodingKey::from_rsa_pem(service_account.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &encoding_key)?)
}
