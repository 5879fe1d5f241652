use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("rename failed: {old} -> {new}: {source}")]
    Rename {
        old: String,
        new: String,
        source: std::io::Error,
    },

    #[error("persist failed: {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("provisioning request failed: {0}")]
    Request(String),

    #[error("provisioning response malformed: {0}")]
    BadResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bridge disposed")]
    Disposed,

    #[error("embedded application error: {0}")]
    Embedded(String),
}

#[derive(Debug, thiserror::Error)]
pub enum VisorError {
    #[error(transparent)]
    Doc(#[from] DocError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
