//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::api::{GamesApi, HealthApi};
use crate::error::{Error, ErrorResponse, Result};

/// Default timeout for requests.
///
/// Covers the server's deliberate delay on unknown game keys.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default prefix the server mounts game routes under.
pub const DEFAULT_ROUTE_PREFIX: &str = "/uc2024";

/// Gambit relay client.
///
/// # Example
///
/// ```no_run
/// use gambit_client::GambitClient;
///
/// # async fn example() -> gambit_client::Result<()> {
/// let client = GambitClient::builder()
///     .base_url("http://localhost:8543")
///     .build()?;
///
/// let state = client.games().poll("abc234").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GambitClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Server root URL, always ending in `/`.
    pub(crate) base_url: Url,
    /// Route prefix as a relative path, `""` or ending in `/`.
    pub(crate) route_prefix: String,
    /// Request timeout.
    pub(crate) timeout: Duration,
}

impl GambitClient {
    /// Get access to the inner client state (for API implementations).
    pub(crate) fn inner(&self) -> &ClientInner {
        &self.inner
    }
}

impl GambitClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings pointing to localhost.
    pub fn localhost() -> Result<Self> {
        Self::builder().base_url("http://127.0.0.1:8543").build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the games API.
    pub fn games(&self) -> GamesApi {
        GamesApi::new(self.clone())
    }

    /// Access the health API.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for a game route from its path segments.
    ///
    /// Each segment is percent-encoded, so a game key can never add a
    /// query, fragment or extra path component.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.join(&self.inner.route_prefix)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("cannot route from {}", self.inner.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments)?;
        tracing::debug!(%url, "GET");
        let response = self
            .inner
            .http
            .get(url)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a POST request with query parameters and no body.
    pub(crate) async fn post<T, Q>(&self, segments: &[&str], query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        tracing::debug!(%url, "POST");
        let response = self
            .inner
            .http
            .post(url)
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T> {
        let url = self.url(segments)?;
        tracing::debug!(%url, "DELETE");
        let response = self
            .inner
            .http
            .delete(url)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        let message = match response.json::<ErrorResponse>().await {
            Ok(err) => err.error,
            Err(_) => format!("HTTP {}", status),
        };

        if status == 404 {
            Error::NotFound(message)
        } else {
            Error::Api { status, message }
        }
    }
}

/// Builder for creating a GambitClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    route_prefix: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the route prefix the server mounts game routes under.
    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = prefix.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GambitClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let prefix = self.route_prefix.trim().trim_matches('/');
        let route_prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", prefix)
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("gambit-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(GambitClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                route_prefix,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
