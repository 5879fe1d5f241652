use clap::Parser;

/// Visor — opens a text document in the embedded visual editor, kept in
/// sync with the host document model.
#[derive(Parser, Debug)]
#[command(name = "visor", version, about)]
pub struct Args {
    /// Path of the document to open, relative to the working directory.
    pub file: String,

    /// Base URL of the session provisioning service.
    #[arg(long, default_value = "http://127.0.0.1:8888/viz")]
    pub base_url: String,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
