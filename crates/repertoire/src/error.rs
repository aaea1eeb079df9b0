use std::io;
use std::path::PathBuf;

use drill_core::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepertoireError {
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
}
