pub mod embedded;
pub mod errors;

pub use embedded::{EmbeddedApp, EmbeddedEvent, RenamePair};
pub use errors::{BridgeError, DocError, ProvisionError, VisorError};

pub type Result<T> = std::result::Result<T, VisorError>;
