//! Rename propagator.
//!
//! Embedded→host: the embedded application exposes no rename event, only
//! a DOM rendering of the current filename, so renames arrive as observed
//! child-list mutations — one `(old, new)` pair per record, already
//! committed on the embedded side. Each pair is applied to the host
//! document manager independently and in delivery order, and the session
//! path follows, so later saves target the new location.
//!
//! Host→embedded: a model path change renames the sidecar configuration
//! resource and remounts the embedded frame at the session URL derived
//! from the new path. This is the only place that remounts the frame
//! after startup.

use tracing::{info, warn};

use visor_common::RenamePair;

use super::Bridge;

impl Bridge {
    pub(crate) fn on_filename_changed(&mut self, renames: Vec<RenamePair>) {
        for RenamePair { old, new } in renames {
            if let Err(e) = self.docman.rename(&old, &new) {
                warn!(old = %old, new = %new, error = %e, "host rename failed");
            }
            // The embedded side already committed the rename; the model
            // follows either way. The session's path-changed notification
            // then moves the sidecar and remounts the frame.
            self.path = new.clone();
            self.session.set_path(&new);
            info!(old = %old, new = %new, "embedded rename propagated to host");
        }
        self.refresh_label();
    }

    pub(crate) fn on_path_changed(&mut self, old: &str, new: &str) {
        let suffix = &self.config.sidecar_suffix;
        let old_sidecar = format!("{old}{suffix}");
        let new_sidecar = format!("{new}{suffix}");
        if let Err(e) = self.docman.rename(&old_sidecar, &new_sidecar) {
            warn!(old = %old_sidecar, new = %new_sidecar, error = %e, "sidecar rename failed");
        }

        self.path = new.to_string();

        let url = self.descriptor.as_ref().map(|d| d.session_url(new));
        if let (Some(url), Some(app)) = (url, self.app.as_mut()) {
            if let Err(e) = app.mount(&url) {
                warn!(url = %url, error = %e, "remount after rename failed");
            }
        }

        self.refresh_label();
        info!(old = %old, new = %new, "host rename propagated to embedded frame");
    }
}
