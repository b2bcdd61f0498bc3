//! Frontend Models
//!
//! Data structures matching backend entities.

use serde::{Deserialize, Serialize};

/// Pantry item (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    pub name: String,
    pub count: i64,
}

/// Error payload returned by backend commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    pub kind: String,
    pub message: String,
}

impl CommandError {
    /// Error raised on this side of the IPC boundary
    pub fn local(message: impl Into<String>) -> Self {
        Self { kind: "internal".to_string(), message: message.into() }
    }

    /// Short user-facing text for the notice banner
    pub fn user_message(&self) -> String {
        match self.kind.as_str() {
            "invalid_input" => self.message.clone(),
            "network" => "Could not reach the store. Check your connection and try again.".to_string(),
            "permission_denied" => "The store refused access. Check the store settings.".to_string(),
            "conflict" => "Someone else is editing this item. Try again.".to_string(),
            "unavailable" => "The store is still starting up.".to_string(),
            "not_found" => format!("Not found: {}", self.message),
            _ => format!("Something went wrong: {}", self.message),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Store configuration (matches backend, API key arrives masked)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: String,
    pub collection: String,
    pub firestore: Option<FirestoreConfig>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    pub database: String,
}
