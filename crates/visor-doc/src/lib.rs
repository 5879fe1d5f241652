//! Host document model.
//!
//! `DocumentSession` is the host's live representation of one open file:
//! path, text buffer and dirty flag, with change notifications delivered
//! over a broadcast channel in the order they occur. `DocumentManager` is
//! the seam to the host's file storage: rename with overwrite semantics,
//! plus persist.

pub mod manager;
pub mod session;

pub use manager::{DocumentManager, FsDocumentManager};
pub use session::{DocEvent, DocumentSession};
