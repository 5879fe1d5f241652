use wry::WebView;

use visor_common::{BridgeError, EmbeddedApp, Result};

use crate::script::{js_set_editor_text, js_set_save_enabled};

use super::types::EmbeddedConfig;

/// Handle to the WebView hosting one embedded editor session.
///
/// Implements [`EmbeddedApp`], the seam the bridge drives the embedded
/// application through.
pub struct EmbeddedHandle {
    webview: WebView,
    config: EmbeddedConfig,
    /// Current URL (best-effort tracking).
    current_url: String,
}

impl EmbeddedHandle {
    pub(super) fn new(webview: WebView, config: EmbeddedConfig, initial_url: String) -> Self {
        Self {
            webview,
            config,
            current_url: initial_url,
        }
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Set the WebView bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<()> {
        self.webview.set_bounds(bounds).map_err(embedded_err)
    }

    /// Get a reference to the underlying wry WebView.
    pub fn inner(&self) -> &WebView {
        &self.webview
    }
}

impl EmbeddedApp for EmbeddedHandle {
    fn mount(&mut self, url: &str) -> Result<()> {
        self.current_url = url.to_string();
        self.webview.load_url(url).map_err(embedded_err)
    }

    fn set_editor_text(&mut self, text: &str) -> Result<()> {
        let js = js_set_editor_text(&self.config, text);
        self.webview.evaluate_script(&js).map_err(embedded_err)
    }

    fn enable_save(&mut self) -> Result<()> {
        let js = js_set_save_enabled(&self.config, true);
        self.webview.evaluate_script(&js).map_err(embedded_err)
    }

    fn disable_save(&mut self) -> Result<()> {
        let js = js_set_save_enabled(&self.config, false);
        self.webview.evaluate_script(&js).map_err(embedded_err)
    }
}

fn embedded_err(e: wry::Error) -> visor_common::VisorError {
    BridgeError::Embedded(e.to_string()).into()
}

/// Shared ownership over an [`EmbeddedHandle`]: the bridge drives it as an
/// [`EmbeddedApp`] while the windowing glue keeps a clone for bounds
/// updates.
#[derive(Clone)]
pub struct SharedEmbedded(pub std::sync::Arc<std::sync::Mutex<EmbeddedHandle>>);

impl SharedEmbedded {
    pub fn new(handle: EmbeddedHandle) -> Self {
        Self(std::sync::Arc::new(std::sync::Mutex::new(handle)))
    }
}

impl EmbeddedApp for SharedEmbedded {
    fn mount(&mut self, url: &str) -> Result<()> {
        self.0.lock().unwrap().mount(url)
    }

    fn set_editor_text(&mut self, text: &str) -> Result<()> {
        self.0.lock().unwrap().set_editor_text(text)
    }

    fn enable_save(&mut self) -> Result<()> {
        self.0.lock().unwrap().enable_save()
    }

    fn disable_save(&mut self) -> Result<()> {
        self.0.lock().unwrap().disable_save()
    }
}
