use serde::de::DeserializeOwned;

use crate::client::CLIENT;
use crate::gcp::auth::TokenSource;
use crate::gcp::error::{ComputeError, Result};
use crate::gcp::gce::types::{Image, Instance, InstanceList, InstanceRequest, Operation};

pub const GCE_API_BASE: &str = crate::settings::DEFAULT_API_BASE;

/// An authenticated handle to the Compute Engine v1 API.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenSource,
}

impl ComputeClient {
    pub fn new(tokens: TokenSource) -> Self {
        Self::with_base_url(tokens, GCE_API_BASE)
    }

    /// A client talking to `base_url` instead of the public endpoint.
    pub fn with_base_url(tokens: TokenSource, base_url: &str) -> Self {
        Self {
            http: CLIENT.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn zone_url(&self, project_id: &str, zone: &str) -> String {
        format!("{}/projects/{}/zones/{}", self.base_url, project_id, zone)
    }

    /// Submits `instances.insert` and returns the operation tracking it.
    pub async fn insert_instance(
        &self,
        project_id: &str,
        zone: &str,
        instance_request: &InstanceRequest,
    ) -> Result<Operation> {
        let url = format!("{}/instances", self.zone_url(project_id, zone));
        tracing::info!(instance = %instance_request.name, %zone, "inserting instance");
        let request = self.http.post(&url).json(instance_request);
        self.send(request).await
    }

    /// Submits `instances.delete` and returns the operation tracking it.
    pub async fn delete_instance(
        &self,
        project_id: &str,
        zone: &str,
        instance: &str,
    ) -> Result<Operation> {
        let url = format!("{}/instances/{}", self.zone_url(project_id, zone), instance);
        tracing::info!(%instance, %zone, "deleting instance");
        self.send(self.http.delete(&url)).await
    }

    /// Fetches the current state of a zonal operation.
    pub async fn get_operation(
        &self,
        project_id: &str,
        zone: &str,
        operation: &str,
    ) -> Result<Operation> {
        let url = format!("{}/operations/{}", self.zone_url(project_id, zone), operation);
        self.send(self.http.get(&url)).await
    }

    /// Lists every instance in the zone, following pagination.
    ///
    /// An empty zone yields an empty vector; the API omits `items` entirely in
    /// that case.
    pub async fn list_instances(&self, project_id: &str, zone: &str) -> Result<Vec<Instance>> {
        let url = format!("{}/instances", self.zone_url(project_id, zone));
        let mut instances = Vec::new();
        let mut page_token: Option<String> = None;

        // Loop to handle paginated results.
        loop {
            let mut request = self.http.get(&url);
            if let Some(ref t) = page_token {
                request = request.query(&[("pageToken", t.as_str())]);
            }
            let page: InstanceList = self.send(request).await?;
            instances.extend(page.items.unwrap_or_default());

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        tracing::debug!(%zone, count = instances.len(), "listed instances");
        Ok(instances)
    }

    /// Resolves the newest non-deprecated image of `family` in `image_project`.
    pub async fn get_image_from_family(&self, image_project: &str, family: &str) -> Result<Image> {
        let url = format!(
            "{}/projects/{}/global/images/family/{}",
            self.base_url, image_project, family
        );
        let image: Image = self.send(self.http.get(&url)).await?;
        tracing::debug!(%family, image = %image.self_link, "resolved image family");
        Ok(image)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let token = self.tokens.token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ComputeError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
