//! The instrumentation protocol between Rust and the embedded page.
//!
//! Messages flow in both directions:
//! - **Page -> Rust**: an initialization script injected into the WebView
//!   probes for the application's readiness marker after load. If the
//!   marker is present it wires editor input, the save control and a
//!   `MutationObserver` on the filename element, posting what it observes
//!   via `window.ipc.postMessage(JSON.stringify({...}))`. If the marker is
//!   absent the script does nothing; whatever loaded is not the expected
//!   application.
//! - **Rust -> Page**: the bridge calls `evaluate_script` to push editor
//!   text and to toggle the save affordance.

use serde::Deserialize;

use visor_common::{EmbeddedEvent, RenamePair};

use crate::manager::EmbeddedConfig;

/// Wire envelope posted by the instrumentation script.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum Envelope {
    Ready,
    EditorInput { text: String },
    SaveClicked,
    FilenameChanged { renames: Vec<RenamePair> },
}

/// Parse a raw IPC body into an event. Unknown or malformed messages
/// yield `None`.
pub fn parse_message(raw: &str) -> Option<EmbeddedEvent> {
    let envelope = serde_json::from_str::<Envelope>(raw).ok()?;
    Some(match envelope {
        Envelope::Ready => EmbeddedEvent::Ready,
        Envelope::EditorInput { text } => EmbeddedEvent::EditorInput { text },
        Envelope::SaveClicked => EmbeddedEvent::SaveClicked,
        Envelope::FilenameChanged { renames } => EmbeddedEvent::FilenameChanged { renames },
    })
}

const INSTRUMENTATION_TEMPLATE: &str = r#"
(function() {
    function hook() {
        var app = window[__MARKER__];
        if (!app) {
            return;
        }
        var post = function(msg) {
            window.ipc.postMessage(JSON.stringify(msg));
        };
        var ed = app[__EDITOR__];

        ed.editor.on('input', function() {
            post({ kind: 'editor-input', text: ed.editor.getValue() });
        });

        var save = document.getElementById(__SAVE_ID__);
        if (save) {
            save.addEventListener('click', function() {
                post({ kind: 'save-clicked' });
            });
        }

        var filename = document.getElementById(__FILENAME_ID__);
        if (filename) {
            new MutationObserver(function(mutations) {
                var renames = [];
                for (var i = 0; i < mutations.length; i++) {
                    var m = mutations[i];
                    if (m.type !== 'childList') {
                        continue;
                    }
                    if (m.addedNodes.length !== 1 || m.removedNodes.length !== 1) {
                        continue;
                    }
                    renames.push({
                        old: m.removedNodes[0].textContent,
                        new: m.addedNodes[0].textContent
                    });
                }
                if (renames.length > 0) {
                    post({ kind: 'filename-changed', renames: renames });
                }
            }).observe(filename, { childList: true });
        }

        post({ kind: 'ready' });
    }
    if (document.readyState === 'complete') {
        hook();
    } else {
        window.addEventListener('load', hook);
    }
})();
"#;

/// Render the instrumentation script for a given embedded configuration.
pub fn instrumentation_script(config: &EmbeddedConfig) -> String {
    INSTRUMENTATION_TEMPLATE
        .replace("__MARKER__", &js_str(&config.marker_global))
        .replace("__EDITOR__", &js_str(&config.editor_object))
        .replace("__SAVE_ID__", &js_str(&config.save_control_id))
        .replace("__FILENAME_ID__", &js_str(&config.filename_element_id))
}

/// JS snippet that replaces the embedded editor buffer. The trailing `1`
/// is the editor's cursor policy (move to end).
pub fn js_set_editor_text(config: &EmbeddedConfig, text: &str) -> String {
    format!(
        "window[{}][{}].editor.setValue({}, 1);",
        js_str(&config.marker_global),
        js_str(&config.editor_object),
        js_str(text),
    )
}

/// JS snippet that toggles the embedded save affordance.
pub fn js_set_save_enabled(config: &EmbeddedConfig, enabled: bool) -> String {
    format!(
        "window[{}][{}].{}();",
        js_str(&config.marker_global),
        js_str(&config.editor_object),
        if enabled { "enable_save" } else { "disable_save" },
    )
}

fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}
