//! The synchronization bridge between the host document model and the
//! embedded visual editor.
//!
//! One [`Bridge`] binds one [`visor_doc::DocumentSession`] to one embedded
//! application instance. After startup it is a steady-state reactive
//! relay:
//! - content flows both ways through equality-gated writes,
//! - the host's dirty flag drives the embedded save affordance,
//! - renames observed inside the embedded application propagate to the
//!   host document manager, and host renames re-point the embedded frame.
//!
//! Startup is the one asynchronous boundary: a session is provisioned
//! (port + token), the frame is mounted, and subscriptions are wired only
//! once the embedded application signals readiness.

pub mod bridge;
pub mod config;
pub mod provision;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use provision::{ProvisionClient, SessionDescriptor};
