//! WebView lifecycle management.
//!
//! `WebViewManager` creates `wry::WebView` instances hosting the embedded
//! visual editor, one per open document. Everything observed inside the
//! page is pushed into an event sink for the main event loop to consume.

use std::sync::{Arc, Mutex};

use visor_common::EmbeddedEvent;

mod handle;
pub mod handlers;
mod lifecycle;
mod types;

pub use handle::{EmbeddedHandle, SharedEmbedded};
pub use types::EmbeddedConfig;

/// Creates WebViews for embedded editor sessions.
pub struct WebViewManager {
    /// Event sink — events are pushed here for the main event loop to consume.
    pub(crate) events: Arc<Mutex<Vec<EmbeddedEvent>>>,
}

impl WebViewManager {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Drain all pending events, in arrival order.
    pub fn drain_events(&self) -> Vec<EmbeddedEvent> {
        let mut events = self.events.lock().unwrap();
        std::mem::take(&mut *events)
    }
}

impl Default for WebViewManager {
    fn default() -> Self {
        Self::new()
    }
}
