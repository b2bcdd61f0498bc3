//! Store Config Commands
//!
//! Frontend bindings for reading and saving the store configuration.

use serde::Serialize;
use crate::models::{CommandError, StoreConfig};
use super::call;

#[derive(Serialize)]
struct SaveConfigArgs<'a> {
    config: &'a StoreConfig,
}

pub async fn get_store_config() -> Result<StoreConfig, CommandError> {
    call::<(), _>("get_store_config", None).await
}

/// Persist and reconnect; the backend keeps the stored key if `api_key` is still masked
pub async fn save_store_config(config: &StoreConfig) -> Result<(), CommandError> {
    call("save_store_config", Some(&SaveConfigArgs { config })).await
}

pub async fn recent_logs() -> Result<Vec<String>, CommandError> {
    call::<(), _>("recent_logs", None).await
}
