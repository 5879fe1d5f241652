//! WebView host for the embedded visual editor.
//!
//! Wraps the `wry` crate to provide:
//! - One managed WebView per open document
//! - An injected instrumentation script that observes the embedded
//!   application (editor input, save clicks, filename mutations) and
//!   forwards what it sees over IPC
//! - A typed event stream (`EmbeddedEvent`) drained by the host loop
//! - Navigation restricted to the provisioned session origin

pub mod manager;
pub mod script;

pub use manager::{EmbeddedConfig, EmbeddedHandle, SharedEmbedded, WebViewManager};
