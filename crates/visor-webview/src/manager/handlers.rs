use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use visor_common::EmbeddedEvent;

use crate::script::parse_message;

use super::WebViewManager;

/// Check whether a URL is allowed inside the embedded frame.
///
/// Only the provisioned session origin and the empty page are permitted;
/// the embedded application has no business navigating anywhere else.
pub fn is_navigation_allowed(url: &str, session_origin: &str) -> bool {
    if url == "about:blank" {
        return true;
    }
    !session_origin.is_empty() && url.starts_with(session_origin)
}

impl WebViewManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<EmbeddedEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();

            let Some(event) = parse_message(&body) else {
                warn!(body_len = body.len(), "IPC message rejected: not a known envelope");
                return;
            };

            debug!(?event, "IPC message from embedded page");
            if let Ok(mut evts) = events.lock() {
                evts.push(event);
            }
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<EmbeddedEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            // Readiness is decided by the instrumentation script's marker
            // probe, not by the load itself.
            if let wry::PageLoadEvent::Finished = event {
                debug!(url = %url, "embedded page loaded");
                if let Ok(mut evts) = events.lock() {
                    evts.push(EmbeddedEvent::Loaded { url });
                }
            }
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        session_origin: String,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            if !is_navigation_allowed(&url, &session_origin) {
                warn!(url = %url, "navigation blocked: outside session origin");
                return false;
            }
            debug!(url = %url, "navigation allowed");
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "http://127.0.0.1:8888/viz/";

    #[test]
    fn allows_session_origin() {
        assert!(is_navigation_allowed(
            "http://127.0.0.1:8888/viz/53533/?filename=a.py&token=abc",
            ORIGIN
        ));
    }

    #[test]
    fn allows_about_blank() {
        assert!(is_navigation_allowed("about:blank", ORIGIN));
        assert!(is_navigation_allowed("about:blank", ""));
    }

    #[test]
    fn blocks_other_origins() {
        assert!(!is_navigation_allowed("https://example.com", ORIGIN));
        assert!(!is_navigation_allowed("http://127.0.0.1:9999/viz/", ORIGIN));
    }

    #[test]
    fn blocks_file_and_script_protocols() {
        assert!(!is_navigation_allowed("file:///etc/passwd", ORIGIN));
        assert!(!is_navigation_allowed("javascript:alert(1)", ORIGIN));
        assert!(!is_navigation_allowed("data:text/html,<h1>x</h1>", ORIGIN));
    }

    #[test]
    fn blocks_everything_without_an_origin() {
        assert!(!is_navigation_allowed("http://127.0.0.1:8888/viz/", ""));
        assert!(!is_navigation_allowed("", ""));
    }
}
