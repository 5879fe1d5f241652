//! Shared fakes and fixtures for the bridge tests.

use std::sync::{Arc, Mutex};

use visor_common::{EmbeddedApp, EmbeddedEvent, Result};
use visor_doc::{DocumentManager, DocumentSession};

use crate::config::BridgeConfig;
use crate::provision::SessionDescriptor;

use super::Bridge;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AppCall {
    Mount(String),
    SetText(String),
    EnableSave,
    DisableSave,
}

/// Recording stand-in for the embedded application.
pub(crate) struct FakeApp {
    calls: Arc<Mutex<Vec<AppCall>>>,
}

impl EmbeddedApp for FakeApp {
    fn mount(&mut self, url: &str) -> Result<()> {
        self.calls.lock().unwrap().push(AppCall::Mount(url.into()));
        Ok(())
    }

    fn set_editor_text(&mut self, text: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(AppCall::SetText(text.into()));
        Ok(())
    }

    fn enable_save(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push(AppCall::EnableSave);
        Ok(())
    }

    fn disable_save(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push(AppCall::DisableSave);
        Ok(())
    }
}

/// Recording stand-in for the host document manager.
#[derive(Default)]
pub(crate) struct RecordingManager {
    pub(crate) renames: Mutex<Vec<(String, String)>>,
    pub(crate) persisted: Mutex<Vec<(String, String)>>,
}

impl DocumentManager for RecordingManager {
    fn rename(&self, old: &str, new: &str) -> Result<()> {
        self.renames
            .lock()
            .unwrap()
            .push((old.to_string(), new.to_string()));
        Ok(())
    }

    fn persist(&self, path: &str, text: &str) -> Result<()> {
        self.persisted
            .lock()
            .unwrap()
            .push((path.to_string(), text.to_string()));
        Ok(())
    }
}

/// Provisioning future that succeeds with the fixture descriptor.
pub(crate) fn ok_provision() -> impl std::future::Future<Output = Result<SessionDescriptor>> {
    async { Ok(SessionDescriptor::new("http://127.0.0.1:8888/viz", 53533, "s3cret")) }
}

pub(crate) struct Fixture {
    pub(crate) bridge: Bridge,
    pub(crate) session: DocumentSession,
    pub(crate) docman: Arc<RecordingManager>,
    calls: Arc<Mutex<Vec<AppCall>>>,
}

impl Fixture {
    pub(crate) fn new(path: &str, text: &str) -> Self {
        let docman = Arc::new(RecordingManager::default());
        let session = DocumentSession::new(
            path,
            text,
            Arc::clone(&docman) as Arc<dyn DocumentManager>,
        );
        let calls = Arc::new(Mutex::new(Vec::new()));
        let app = Box::new(FakeApp {
            calls: Arc::clone(&calls),
        });
        let bridge = Bridge::new(session.clone(), app, BridgeConfig::default());
        Self {
            bridge,
            session,
            docman,
            calls,
        }
    }

    /// A bridge that has completed startup and wiring.
    pub(crate) async fn wired(path: &str, text: &str) -> Self {
        let mut fix = Self::new(path, text);
        fix.bridge.start(ok_provision()).await.unwrap();
        fix.bridge.on_embedded_event(EmbeddedEvent::Ready);
        fix
    }

    pub(crate) fn app_calls(&self) -> Vec<AppCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_app_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}
