//! Dirty-state reconciler: reflects the model's dirty flag into the
//! embedded save affordance and the bridge's own label decoration, and
//! turns embedded save clicks into host persists.

use tracing::warn;

use super::Bridge;

/// Appended to the label while the document has unsaved changes.
pub(crate) const DIRTY_MARKER: &str = " ●";

impl Bridge {
    pub(crate) fn on_dirty_changed(&mut self) {
        let dirty = self.session.is_dirty();
        if let Some(app) = self.app.as_mut() {
            let result = if dirty {
                app.enable_save()
            } else {
                app.disable_save()
            };
            if let Err(e) = result {
                warn!(error = %e, dirty, "failed to toggle embedded save affordance");
            }
        }
        self.refresh_label();
    }

    /// The embedded save control was activated. Saves at most once per
    /// activation, and only when there is something to save.
    pub(crate) fn on_save_clicked(&mut self) {
        if !self.session.is_dirty() {
            return;
        }
        // Clear first, then persist; the flip propagates back through the
        // state-changed notification and disables the affordance.
        self.session.set_dirty(false);
        if let Err(e) = self.session.save() {
            warn!(error = %e, "save failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::*;
    use super::DIRTY_MARKER;

    use visor_common::EmbeddedEvent;

    #[tokio::test]
    async fn dirty_enables_save_and_decorates_label() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;
        fix.clear_app_calls();

        fix.session.set_dirty(true);
        fix.bridge.pump_doc_events();

        assert!(fix
            .app_calls()
            .iter()
            .any(|c| matches!(c, AppCall::EnableSave)));
        assert_eq!(fix.bridge.label(), format!("a.py{DIRTY_MARKER}"));
    }

    #[tokio::test]
    async fn clean_disables_save_and_strips_label() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;
        fix.session.set_dirty(true);
        fix.bridge.pump_doc_events();
        fix.clear_app_calls();

        fix.session.set_dirty(false);
        fix.bridge.pump_doc_events();

        assert!(fix
            .app_calls()
            .iter()
            .any(|c| matches!(c, AppCall::DisableSave)));
        assert_eq!(fix.bridge.label(), "a.py");
    }

    #[tokio::test]
    async fn affordance_follows_every_flip() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;
        fix.clear_app_calls();

        fix.session.set_dirty(true);
        fix.bridge.pump_doc_events();
        fix.session.set_dirty(false);
        fix.bridge.pump_doc_events();
        fix.session.set_dirty(true);
        fix.bridge.pump_doc_events();

        assert_eq!(
            fix.app_calls(),
            vec![AppCall::EnableSave, AppCall::DisableSave, AppCall::EnableSave]
        );
    }

    #[tokio::test]
    async fn save_click_persists_exactly_once() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;
        fix.bridge.on_embedded_event(EmbeddedEvent::EditorInput {
            text: "x = 2".into(),
        });
        assert!(fix.session.is_dirty());

        fix.bridge.on_embedded_event(EmbeddedEvent::SaveClicked);

        assert!(!fix.session.is_dirty());
        assert_eq!(
            fix.docman.persisted.lock().unwrap().as_slice(),
            &[("a.py".to_string(), "x = 2".to_string())]
        );
    }

    #[tokio::test]
    async fn save_click_on_clean_document_is_a_noop() {
        let mut fix = Fixture::wired("a.py", "x = 1").await;

        fix.bridge.on_embedded_event(EmbeddedEvent::SaveClicked);

        assert!(fix.docman.persisted.lock().unwrap().is_empty());
        assert!(!fix.session.is_dirty());
    }
}
