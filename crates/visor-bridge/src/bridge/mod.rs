//! Bridge lifecycle.
//!
//! State machine: `Idle` → (provision + mount) → `AwaitingReady` →
//! (embedded readiness signal) → `Wired`. Provisioning failure parks the
//! bridge in `Failed`; readiness is then never signaled and nothing is
//! ever wired. Disposal is allowed from any state, including mid-startup.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use visor_common::{BridgeError, EmbeddedApp, EmbeddedEvent, Result};
use visor_doc::{DocEvent, DocumentManager, DocumentSession};

use crate::config::BridgeConfig;
use crate::provision::SessionDescriptor;

mod dirty;
mod rename;
mod sync;

#[cfg(test)]
pub(crate) mod testutil;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeState {
    /// Created, startup not attempted or still provisioning.
    Idle,
    /// Mounted; waiting for the embedded application's readiness signal.
    AwaitingReady,
    /// Subscriptions wired; steady-state relay.
    Wired,
    /// Provisioning failed. Terminal; the host recreates the bridge.
    Failed,
}

/// Binds one document session to one embedded application instance.
pub struct Bridge {
    pub(crate) session: DocumentSession,
    pub(crate) docman: Arc<dyn DocumentManager>,
    pub(crate) app: Option<Box<dyn EmbeddedApp>>,
    pub(crate) config: BridgeConfig,

    descriptor: Option<SessionDescriptor>,
    doc_events: Option<broadcast::Receiver<DocEvent>>,
    state: BridgeState,
    disposed: bool,

    /// Mirror of the embedded editor's live buffer. Updated on every
    /// observed input and every outbound write; both sync directions gate
    /// on it.
    pub(crate) embedded_text: String,
    /// The path this bridge currently believes the document lives at.
    pub(crate) path: String,
    pub(crate) label: String,

    ready_tx: watch::Sender<bool>,
    ready_rx: watch::Receiver<bool>,
}

impl Bridge {
    pub fn new(session: DocumentSession, app: Box<dyn EmbeddedApp>, config: BridgeConfig) -> Self {
        let path = session.path();
        let docman = Arc::clone(session.manager());
        let (ready_tx, ready_rx) = watch::channel(false);
        Self {
            session,
            docman,
            app: Some(app),
            config,
            descriptor: None,
            doc_events: None,
            state: BridgeState::Idle,
            disposed: false,
            embedded_text: String::new(),
            label: path.clone(),
            path,
            ready_tx,
            ready_rx,
        }
    }

    /// Run the startup sequence: acquire a session descriptor from the
    /// provisioning future, then mount the embedded frame at the derived
    /// session URL. Wiring happens later, when the embedded application
    /// signals readiness via [`EmbeddedEvent::Ready`].
    ///
    /// On provisioning failure the bridge never becomes ready and no
    /// subscriptions are wired. Disposing the bridge while provisioning is
    /// in flight suppresses the rest of the sequence.
    pub async fn start<F>(&mut self, provision: F) -> Result<()>
    where
        F: std::future::Future<Output = Result<SessionDescriptor>>,
    {
        let descriptor = match provision.await {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "provisioning failed; bridge will never become ready");
                self.state = BridgeState::Failed;
                return Err(e);
            }
        };

        if self.disposed {
            debug!("disposed during provisioning; startup suppressed");
            return Err(BridgeError::Disposed.into());
        }

        let url = descriptor.session_url(&self.path);
        self.descriptor = Some(descriptor);
        if let Some(app) = self.app.as_mut() {
            app.mount(&url)?;
        }
        self.state = BridgeState::AwaitingReady;
        debug!(url = %url, "embedded application mounted");
        Ok(())
    }

    /// Readiness notification. Resolves to `true` at most once, when the
    /// embedded application has signaled readiness and the relay is wired.
    /// On startup failure it never resolves.
    pub fn ready(&self) -> watch::Receiver<bool> {
        self.ready_rx.clone()
    }

    /// Feed one event observed on the embedded side. Called by the host
    /// loop, in delivery order.
    pub fn on_embedded_event(&mut self, event: EmbeddedEvent) {
        if self.disposed {
            return;
        }
        match event {
            EmbeddedEvent::Ready => self.handle_ready(),
            EmbeddedEvent::Loaded { url } => {
                // Not a readiness signal: content without the marker stays
                // inert until a later load succeeds.
                debug!(url = %url, "embedded page load observed");
            }
            EmbeddedEvent::EditorInput { text } => {
                if self.state == BridgeState::Wired {
                    self.on_editor_input(text);
                }
            }
            EmbeddedEvent::SaveClicked => {
                if self.state == BridgeState::Wired {
                    self.on_save_clicked();
                }
            }
            EmbeddedEvent::FilenameChanged { renames } => {
                if self.state == BridgeState::Wired {
                    self.on_filename_changed(renames);
                }
            }
            EmbeddedEvent::Closed => self.dispose(),
        }
    }

    /// Drain pending document-model notifications and react to each, in
    /// source order. Called cooperatively by the host loop.
    pub fn pump_doc_events(&mut self) {
        loop {
            let Some(rx) = self.doc_events.as_mut() else {
                return;
            };
            let event = match rx.try_recv() {
                Ok(event) => event,
                Err(broadcast::error::TryRecvError::Empty) => return,
                Err(broadcast::error::TryRecvError::Closed) => return,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!(skipped = n, "document notifications lagged");
                    continue;
                }
            };
            if self.disposed {
                return;
            }
            self.dispatch_doc_event(event);
        }
    }

    /// Tear down the relay. Idempotent; safe to call before, during or
    /// after startup. No callback fires after this returns.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        // Dropping the receiver is the unsubscribe.
        self.doc_events = None;
        self.app = None;
        debug!(path = %self.path, "bridge disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Visible label: current path, decorated while dirty.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The path the bridge currently tracks for the document.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn handle_ready(&mut self) {
        match self.state {
            BridgeState::AwaitingReady => {
                // The embedded application served the same persisted file
                // the session was loaded from; the buffers start equal.
                self.embedded_text = self.session.text();
                self.doc_events = Some(self.session.subscribe());
                let _ = self.ready_tx.send(true);
                self.state = BridgeState::Wired;
                info!(path = %self.path, "embedded application ready; bridge wired");
            }
            BridgeState::Wired => {
                // A remount (rename) reloaded the page. Re-seed the editor
                // with the authoritative model text.
                let text = self.session.text();
                self.embedded_text = text.clone();
                if let Some(app) = self.app.as_mut() {
                    if let Err(e) = app.set_editor_text(&text) {
                        warn!(error = %e, "failed to re-seed embedded editor");
                    }
                }
                debug!(path = %self.path, "embedded application re-ready");
            }
            BridgeState::Idle | BridgeState::Failed => {}
        }
    }

    fn dispatch_doc_event(&mut self, event: DocEvent) {
        match event {
            DocEvent::ContentChanged => self.on_model_content_changed(),
            DocEvent::StateChanged { name: "dirty" } => self.on_dirty_changed(),
            DocEvent::StateChanged { .. } => {}
            DocEvent::PathChanged { old, new } => self.on_path_changed(&old, &new),
        }
    }

    pub(crate) fn refresh_label(&mut self) {
        self.label = if self.session.is_dirty() {
            format!("{}{}", self.path, dirty::DIRTY_MARKER)
        } else {
            self.path.clone()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::*;
    use super::*;

    use visor_common::ProvisionError;

    #[tokio::test]
    async fn startup_wires_on_ready() {
        let mut fix = Fixture::new("a.py", "x = 1");
        fix.bridge.start(ok_provision()).await.unwrap();
        assert!(!*fix.bridge.ready().borrow());
        assert_eq!(fix.session.subscriber_count(), 0);

        fix.bridge.on_embedded_event(EmbeddedEvent::Ready);

        assert!(*fix.bridge.ready().borrow());
        assert_eq!(fix.session.subscriber_count(), 1);
        assert!(matches!(fix.app_calls()[0], AppCall::Mount(ref url)
            if url == "http://127.0.0.1:8888/viz/53533/?filename=a.py&token=s3cret"));
    }

    #[tokio::test]
    async fn provisioning_failure_never_signals_ready() {
        let mut fix = Fixture::new("a.py", "x = 1");
        let err = fix
            .bridge
            .start(async { Err(ProvisionError::Request("refused".into()).into()) })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("refused"));

        // A later readiness signal must not wire anything either.
        fix.bridge.on_embedded_event(EmbeddedEvent::Ready);

        assert!(!*fix.bridge.ready().borrow());
        assert_eq!(fix.session.subscriber_count(), 0);
        assert!(fix.app_calls().is_empty());
    }

    #[tokio::test]
    async fn load_without_ready_leaves_bridge_inert_but_recoverable() {
        let mut fix = Fixture::new("a.py", "x = 1");
        fix.bridge.start(ok_provision()).await.unwrap();

        fix.bridge.on_embedded_event(EmbeddedEvent::Loaded {
            url: "http://127.0.0.1:8888/viz/53533/?filename=a.py&token=s3cret".into(),
        });
        assert!(!*fix.bridge.ready().borrow());
        assert_eq!(fix.session.subscriber_count(), 0);

        // A reload that does carry the marker succeeds afterwards.
        fix.bridge.on_embedded_event(EmbeddedEvent::Ready);
        assert!(*fix.bridge.ready().borrow());
    }

    #[tokio::test]
    async fn dispose_before_startup_completes_suppresses_wiring() {
        let mut fix = Fixture::new("a.py", "x = 1");
        fix.bridge.dispose();

        let err = fix.bridge.start(ok_provision()).await.unwrap_err();
        assert!(matches!(
            err,
            visor_common::VisorError::Bridge(BridgeError::Disposed)
        ));

        fix.bridge.on_embedded_event(EmbeddedEvent::Ready);
        assert!(!*fix.bridge.ready().borrow());
        assert_eq!(fix.session.subscriber_count(), 0);
        assert!(fix.app_calls().is_empty());
    }

    #[tokio::test]
    async fn dispose_is_idempotent_and_silences_everything() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;
        fix.bridge.dispose();
        fix.bridge.dispose();

        assert_eq!(fix.session.subscriber_count(), 0);
        fix.clear_app_calls();

        fix.session.set_text("x = 2");
        fix.bridge.pump_doc_events();
        fix.bridge.on_embedded_event(EmbeddedEvent::EditorInput {
            text: "stale".into(),
        });
        fix.bridge.on_embedded_event(EmbeddedEvent::SaveClicked);

        assert!(fix.app_calls().is_empty());
        assert_eq!(fix.session.text(), "x = 2");
        assert!(fix.docman.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn closed_event_disposes() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;
        fix.bridge.on_embedded_event(EmbeddedEvent::Closed);
        assert!(fix.bridge.is_disposed());
        assert_eq!(fix.session.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn re_ready_reseeds_editor_from_model() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;
        fix.clear_app_calls();

        fix.bridge.on_embedded_event(EmbeddedEvent::Ready);

        assert!(matches!(
            fix.app_calls().as_slice(),
            [AppCall::SetText(ref t)] if t == "x = 1"
        ));
    }

    #[tokio::test]
    async fn events_before_wiring_are_ignored() {
        let mut fix = Fixture::new("a.py", "x = 1");
        fix.bridge.start(ok_provision()).await.unwrap();

        fix.bridge.on_embedded_event(EmbeddedEvent::EditorInput {
            text: "y = 2".into(),
        });
        fix.bridge.on_embedded_event(EmbeddedEvent::SaveClicked);

        assert_eq!(fix.session.text(), "x = 1");
        assert!(fix.docman.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn label_starts_as_path() {
        let fix = Fixture::new("a.py", "x = 1");
        assert_eq!(fix.bridge.label(), "a.py");
        assert_eq!(fix.bridge.path(), "a.py");
    }
}
