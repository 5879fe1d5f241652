use std::sync::Arc;

use tracing::debug;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::script::instrumentation_script;

use super::handle::EmbeddedHandle;
use super::types::EmbeddedConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create a new embedded-editor WebView as a child of the given window.
    ///
    /// The `window` must implement `raw_window_handle::HasWindowHandle`.
    /// The WebView is positioned at `bounds` within the parent window.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
        config: EmbeddedConfig,
    ) -> Result<EmbeddedHandle, wry::Error> {
        let events = Arc::clone(&self.events);

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_focused(false);

        // Instrumentation: marker probe, editor input, save clicks,
        // filename mutations.
        let script = instrumentation_script(&config);
        builder = builder.with_initialization_script(script.as_str());

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, Arc::clone(&events));
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events));
        builder = Self::attach_navigation_handler(builder, config.session_origin.clone());

        let initial_url = match &config.url {
            Some(url) => {
                builder = builder.with_url(url);
                url.clone()
            }
            None => {
                builder = builder.with_html("<html><body></body></html>");
                "about:blank".to_string()
            }
        };

        let webview = builder.build_as_child(window)?;

        debug!(url = %initial_url, "embedded WebView created");

        Ok(EmbeddedHandle::new(webview, config, initial_url))
    }
}
