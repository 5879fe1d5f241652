//! Session provisioning.
//!
//! The embedded application is backed by a per-session server instance.
//! One request per bridge startup asks the provisioning service for the
//! instance's port and access token; failure is terminal for that bridge
//! (the host recreates the bridge to retry, e.g. by reopening the
//! document).

use serde::Deserialize;
use tracing::debug;

use visor_common::{ProvisionError, Result};

/// Wire shape of the provisioning response.
#[derive(Debug, Deserialize)]
struct ProvisionResponse {
    port: u16,
    token: String,
}

/// Identifies the embedded application's backing server instance for one
/// document. Immutable after creation; only the path embedded in derived
/// URLs changes, on rename.
#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    base: String,
    port: u16,
    token: String,
}

impl SessionDescriptor {
    pub fn new(base: impl Into<String>, port: u16, token: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            port,
            token: token.into(),
        }
    }

    /// The URL the embedded frame is mounted at for a given document path.
    pub fn session_url(&self, path: &str) -> String {
        format!(
            "{}/{}/?filename={}&token={}",
            self.base,
            self.port,
            urlencoding::encode(path),
            self.token,
        )
    }

    /// Origin prefix shared by every URL of this session. Used to fence
    /// embedded navigation.
    pub fn origin(&self) -> String {
        format!("{}/{}/", self.base, self.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Client for the session provisioning service.
pub struct ProvisionClient {
    base: String,
    http: reqwest::Client,
}

impl ProvisionClient {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Request a session. Used once per bridge startup; never retried.
    pub async fn acquire(&self) -> Result<SessionDescriptor> {
        let url = format!("{}/start_gui", self.base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProvisionError::Request(e.to_string()))?;

        let body: ProvisionResponse = response
            .json()
            .await
            .map_err(|e| ProvisionError::BadResponse(e.to_string()))?;

        debug!(port = body.port, "session provisioned");
        Ok(SessionDescriptor::new(
            self.base.clone(),
            body.port,
            body.token,
        ))
    }
}
