//! Commands Layer
//!
//! Tauri command handlers that bridge frontend to backend services.

mod pantry_cmd;
mod config_cmd;

pub use pantry_cmd::*;
pub use config_cmd::*;

use serde::Serialize;
use crate::domain::DomainError;

/// Error shape sent over IPC: a stable kind plus a human message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandError {
    pub kind: String,
    pub message: String,
}

impl From<DomainError> for CommandError {
    fn from(e: DomainError) -> Self {
        if !matches!(e, DomainError::InvalidInput(_)) {
            log::error!("{}", e);
        }
        Self { kind: e.kind().to_string(), message: e.to_string() }
    }
}
