use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::debug;

use visor_common::Result;

use crate::manager::DocumentManager;

/// Change notifications emitted by a [`DocumentSession`].
///
/// Notifications are delivered in the order the mutations occur; the
/// channel never reorders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocEvent {
    /// The text buffer changed.
    ContentChanged,
    /// A session attribute changed. Carries the attribute name.
    StateChanged { name: &'static str },
    /// The document was renamed.
    PathChanged { old: String, new: String },
}

struct Inner {
    path: String,
    text: String,
    dirty: bool,
}

/// The host's live model of one open file.
///
/// Cheap to clone; all clones share the same state and the same
/// notification channel. The bridge holds a clone for its lifetime but
/// never owns the session.
#[derive(Clone)]
pub struct DocumentSession {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<DocEvent>,
    manager: Arc<dyn DocumentManager>,
}

impl DocumentSession {
    pub fn new(
        path: impl Into<String>,
        text: impl Into<String>,
        manager: Arc<dyn DocumentManager>,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                path: path.into(),
                text: text.into(),
                dirty: false,
            })),
            events,
            manager,
        }
    }

    pub fn path(&self) -> String {
        self.inner.lock().unwrap().path.clone()
    }

    pub fn text(&self) -> String {
        self.inner.lock().unwrap().text.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.lock().unwrap().dirty
    }

    /// Replace the text buffer. Marks the session dirty and emits
    /// `ContentChanged` (and `StateChanged` if the dirty flag flipped).
    /// Writing the current value back is a no-op.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        let was_dirty;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.text == text {
                return;
            }
            inner.text = text;
            was_dirty = inner.dirty;
            inner.dirty = true;
        }
        self.emit(DocEvent::ContentChanged);
        if !was_dirty {
            self.emit(DocEvent::StateChanged { name: "dirty" });
        }
    }

    /// Set the dirty flag. Emits `StateChanged` only when the flag flips.
    pub fn set_dirty(&self, dirty: bool) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.dirty == dirty {
                return;
            }
            inner.dirty = dirty;
        }
        self.emit(DocEvent::StateChanged { name: "dirty" });
    }

    /// Rename the document. Emits `PathChanged { old, new }`.
    pub fn set_path(&self, path: impl Into<String>) {
        let path = path.into();
        let old;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.path == path {
                return;
            }
            old = std::mem::replace(&mut inner.path, path.clone());
        }
        self.emit(DocEvent::PathChanged { old, new: path });
    }

    /// Persist the current text through the document manager and mark the
    /// session clean.
    pub fn save(&self) -> Result<()> {
        let (path, text) = {
            let inner = self.inner.lock().unwrap();
            (inner.path.clone(), inner.text.clone())
        };
        self.manager.persist(&path, &text)?;
        debug!(path = %path, "document saved");
        self.set_dirty(false);
        Ok(())
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<DocEvent> {
        self.events.subscribe()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn manager(&self) -> &Arc<dyn DocumentManager> {
        &self.manager
    }

    fn emit(&self, event: DocEvent) {
        // No subscribers is fine; startup happens before the bridge wires.
        let _ = self.events.send(event);
    }
}
