//! `ApplicationHandler` implementation driving the bridge.
//!
//! One window, one webview, one bridge. The event loop is the single
//! logical thread everything reacts on: webview events are drained and
//! fed to the bridge, then pending document notifications are pumped.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use visor_bridge::{Bridge, BridgeConfig, ProvisionClient};
use visor_common::EmbeddedEvent;
use visor_doc::{DocumentSession, FsDocumentManager};
use visor_webview::{EmbeddedConfig, EmbeddedHandle, SharedEmbedded, WebViewManager};

use crate::cli::Args;

const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct VisorApp {
    args: Args,
    runtime: tokio::runtime::Runtime,

    window: Option<Arc<Window>>,
    webviews: Option<WebViewManager>,
    embedded: Option<Arc<Mutex<EmbeddedHandle>>>,
    bridge: Option<Bridge>,

    last_poll: Instant,
}

impl VisorApp {
    pub fn new(args: Args, runtime: tokio::runtime::Runtime) -> Self {
        Self {
            args,
            runtime,
            window: None,
            webviews: None,
            embedded: None,
            bridge: None,
            last_poll: Instant::now(),
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let window = match event_loop.create_window(
            Window::default_attributes().with_title(self.args.file.clone()),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                return false;
            }
        };

        let text = std::fs::read_to_string(&self.args.file).unwrap_or_else(|e| {
            tracing::warn!(file = %self.args.file, "could not read document, starting empty: {e}");
            String::new()
        });
        let docman: Arc<dyn visor_doc::DocumentManager> = Arc::new(FsDocumentManager::new("."));
        let session = DocumentSession::new(&self.args.file, text, docman);

        // The session is acquired here, up front, and handed to the bridge
        // explicitly.
        let client = ProvisionClient::new(&self.args.base_url);
        let provision = self.runtime.block_on(client.acquire());
        let origin = provision
            .as_ref()
            .map(|d| d.origin())
            .unwrap_or_default();

        let manager = WebViewManager::new();
        let mut embedded_config = EmbeddedConfig::default();
        embedded_config.session_origin = origin;
        let size = window.inner_size();
        let bounds = wry::Rect {
            position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
            size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(size.width, size.height)),
        };
        let handle = match manager.create(&*window, bounds, embedded_config) {
            Ok(h) => h,
            Err(e) => {
                tracing::error!("failed to create webview: {e}");
                return false;
            }
        };
        let shared = SharedEmbedded::new(handle);

        let mut bridge = Bridge::new(
            session,
            Box::new(shared.clone()),
            BridgeConfig {
                base_url: self.args.base_url.clone(),
                ..Default::default()
            },
        );
        if let Err(e) = self.runtime.block_on(bridge.start(async move { provision })) {
            // The bridge never becomes ready; the window stays blank.
            tracing::warn!("bridge startup failed: {e}");
        }

        self.window = Some(window);
        self.webviews = Some(manager);
        self.embedded = Some(shared.0);
        self.bridge = Some(bridge);
        true
    }

    fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.relay_events();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    fn relay_events(&mut self) {
        let (Some(manager), Some(bridge)) = (self.webviews.as_ref(), self.bridge.as_mut()) else {
            return;
        };
        for event in manager.drain_events() {
            bridge.on_embedded_event(event);
        }
        bridge.pump_doc_events();

        if let Some(window) = &self.window {
            window.set_title(bridge.label());
        }
    }

    fn sync_bounds(&self, width: u32, height: u32) {
        if let Some(embedded) = &self.embedded {
            let bounds = wry::Rect {
                position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
                size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(width, height)),
            };
            if let Err(e) = embedded.lock().unwrap().set_bounds(bounds) {
                tracing::warn!("failed to resize webview: {e}");
            }
        }
    }
}

impl ApplicationHandler for VisorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if !self.initialize(event_loop) {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested");
                if let Some(bridge) = self.bridge.as_mut() {
                    bridge.on_embedded_event(EmbeddedEvent::Closed);
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_bounds(size.width, size.height);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_and_schedule(event_loop);
    }
}
