//! Store Configuration Commands
//!
//! Read and replace the store configuration. Saving reconnects immediately.

use tauri::State;

use crate::config::StoreConfig;
use crate::repository;
use crate::AppState;
use super::CommandError;

/// Current configuration with the API key masked
#[tauri::command]
pub async fn get_store_config(state: State<'_, AppState>) -> Result<StoreConfig, CommandError> {
    Ok(state.config.lock().await.redacted())
}

/// Validate, persist and switch to a new configuration
#[tauri::command]
pub async fn save_store_config(state: State<'_, AppState>, config: StoreConfig) -> Result<(), CommandError> {
    let mut current = state.config.lock().await;
    let config = config.merge_secret(&current);
    config.validate()?;

    // Connect first so a bad config never replaces a working store
    let repo = repository::connect(&config, &state.db_path).await?;
    config.save(&state.config_path)?;
    state.store.install(repo).await;

    log::info!("Store config saved: backend={:?} collection='{}'", config.backend, config.collection);
    *current = config;
    Ok(())
}

/// Lines held by the in-memory log buffer, oldest first
#[tauri::command]
pub fn recent_logs() -> Vec<String> {
    rolling_logger::recent_lines()
}
