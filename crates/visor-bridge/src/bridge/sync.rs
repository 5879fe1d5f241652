//! Content synchronizer: keeps the document model's text buffer and the
//! embedded editor's live buffer equal, in both directions.
//!
//! Every write is equality-gated, so a write in one direction leaves the
//! buffers equal and the reciprocal change notification no-ops. That is
//! the whole loop-avoidance story; no reentrancy lock, because all
//! reactions run as discrete callbacks on one logical thread.

use tracing::warn;

use super::Bridge;

impl Bridge {
    /// Embedded editor input: host model is the sink.
    pub(crate) fn on_editor_input(&mut self, text: String) {
        self.embedded_text = text.clone();
        if text != self.session.text() {
            self.session.set_text(text);
        }
    }

    /// Document model content changed: embedded editor is the sink.
    pub(crate) fn on_model_content_changed(&mut self) {
        let text = self.session.text();
        if text == self.embedded_text {
            return;
        }
        self.embedded_text = text.clone();
        if let Some(app) = self.app.as_mut() {
            if let Err(e) = app.set_editor_text(&text) {
                warn!(error = %e, "failed to push model text into embedded editor");
            }
        }
    }
}
