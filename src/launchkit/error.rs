use crate::bookmark::StoreKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Could not save {}: {message}", path.display())]
    Persist { path: PathBuf, message: String },

    #[error("No readable or writable location for the {0} store")]
    NoLocation(StoreKind),

    #[error("Store is read-only: {0}")]
    ReadOnly(StoreKind),

    #[error("Binding would create a cycle")]
    CyclicBinding,

    #[error("Unknown store kind: {0}")]
    UnknownStoreKind(String),

    #[error("Status error: {0}")]
    Status(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
