use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::export::ExportError;
use crate::core::io::silent::SilentError;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read silent file '{path}': {source}", path = path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: SilentError,
    },

    #[error("Failed to write {artifact} '{path}': {source}", path = path.display())]
    Export {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: ExportError,
    },
}
