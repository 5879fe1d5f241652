//! The narrow surface of the embedded visual editor.
//!
//! The embedded application is an opaque, separately-served web app. The
//! host only ever sees it through two channels: a stream of
//! [`EmbeddedEvent`]s (observed inside the page and forwarded over IPC)
//! and the [`EmbeddedApp`] commands the bridge pushes back in.

use serde::{Deserialize, Serialize};

use crate::Result;

/// One observed rename, derived from a child-list mutation of the
/// embedded application's filename display: the removed node's text is the
/// old name, the added node's text is the new name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePair {
    pub old: String,
    pub new: String,
}

/// Events observed inside the embedded application.
///
/// Delivered in the order they occur on the embedded side; a single
/// mutation batch may carry several rename pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedEvent {
    /// A page finished loading in the embedded frame. Carries the URL.
    /// Says nothing about whether the page is the expected application.
    Loaded { url: String },
    /// The expected application is present and instrumented. Emitted only
    /// when the readiness marker was found after load.
    Ready,
    /// The embedded editor's buffer changed. Carries the full buffer.
    EditorInput { text: String },
    /// The embedded save control was activated.
    SaveClicked,
    /// The filename display mutated; one pair per child-list record.
    FilenameChanged { renames: Vec<RenamePair> },
    /// The embedded application was torn down.
    Closed,
}

/// Commands the bridge issues to the embedded application.
///
/// Implemented by the webview-backed handle; tests substitute a recording
/// fake.
pub trait EmbeddedApp {
    /// Point the embedded frame at a new session URL.
    fn mount(&mut self, url: &str) -> Result<()>;
    /// Replace the embedded editor's buffer.
    fn set_editor_text(&mut self, text: &str) -> Result<()>;
    /// Enable the embedded save affordance.
    fn enable_save(&mut self) -> Result<()>;
    /// Disable the embedded save affordance.
    fn disable_save(&mut self) -> Result<()>;
}
