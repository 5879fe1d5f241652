use serde::Deserialize;

/// Bridge configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base URL of the provisioning service; session URLs are derived
    /// under it.
    pub base_url: String,
    /// Suffix of the sidecar configuration resource renamed alongside the
    /// document.
    pub sidecar_suffix: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8888/viz".to_string(),
            sidecar_suffix: ".cfg".to_string(),
        }
    }
}
