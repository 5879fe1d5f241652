/// Configuration for creating an embedded editor WebView.
#[derive(Debug, Clone)]
pub struct EmbeddedConfig {
    /// Initial session URL to load.
    pub url: Option<String>,
    /// Origin prefix of the provisioned session; navigation outside it is
    /// blocked.
    pub session_origin: String,
    /// Global the embedded application installs on its window. Its
    /// presence after load is the readiness marker.
    pub marker_global: String,
    /// Name of the editor sub-object on the marker global.
    pub editor_object: String,
    /// Id of the element whose children display the current filename.
    pub filename_element_id: String,
    /// Id of the save control element.
    pub save_control_id: String,
    /// Whether the WebView background should be transparent.
    pub transparent: bool,
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl Default for EmbeddedConfig {
    fn default() -> Self {
        Self {
            url: None,
            session_origin: String::new(),
            marker_global: "Viz".to_string(),
            editor_object: "ace".to_string(),
            filename_element_id: "filename".to_string(),
            save_control_id: "Save_file".to_string(),
            transparent: false,
            devtools: cfg!(debug_assertions),
            user_agent: Some("Visor/0.1".to_string()),
        }
    }
}

impl EmbeddedConfig {
    /// Create a config that loads a session URL, restricting navigation to
    /// its origin.
    pub fn with_session(url: impl Into<String>, session_origin: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            session_origin: session_origin.into(),
            ..Default::default()
        }
    }
}
