//! Health API.

use crate::client::GambitClient;
use crate::error::{Error, Result};
use crate::types::HealthResponse;

/// Health API client.
///
/// The health route lives at the server root, outside the route prefix.
pub struct HealthApi {
    client: GambitClient,
}

impl HealthApi {
    pub(crate) fn new(client: GambitClient) -> Self {
        Self { client }
    }

    /// Check basic health.
    pub async fn check(&self) -> Result<HealthResponse> {
        let inner = self.client.inner();
        let url = inner.base_url.join("health").map_err(Error::from)?;

        let response = inner.http.get(url).timeout(inner.timeout).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Error::Api {
                status: response.status().as_u16(),
                message: "Health check failed".to_string(),
            })
        }
    }

    /// Simple connectivity check - returns true if server is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.check().await.is_ok()
    }
}
