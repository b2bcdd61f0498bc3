//! Pantry Backend
//!
//! Layered architecture:
//! - domain: Pantry item, boundary validation and errors
//! - repository: Document-store abstraction, SQLite/Firestore backends, pantry operations
//! - commands: Tauri command handlers
//! - config: Which store backs the pantry collection

use std::path::PathBuf;
use tauri::{Emitter, Manager};
use tokio::sync::Mutex;

mod commands;
mod config;
mod domain;
mod repository;

use config::StoreConfig;
use repository::StoreState;

/// Application state shared across commands
pub struct AppState {
    pub store: StoreState,
    pub config: Mutex<StoreConfig>,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
}

fn app_dir(dir: tauri::Result<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = dir?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            // Single instance check - must be first!
            #[cfg(desktop)]
            app.handle().plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
                // Focus the existing window when a new instance tries to start
                if let Some(window) = app.get_webview_window("main") {
                    let _ = window.set_focus();
                }
            }))?;

            let app_handle = app.handle().clone();

            // Initialize logging
            rolling_logger::init_logger(app_handle.path().app_log_dir()?, "Pantry")?;

            let data_dir = app_dir(app_handle.path().app_data_dir())?;
            let config_dir = app_dir(app_handle.path().app_config_dir())?;
            let db_path = data_dir.join("pantry.db");
            let config_path = config::config_path(&config_dir);

            let store_config = match StoreConfig::load(&config_path) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Ignoring store config: {}", e);
                    StoreConfig::default()
                }
            }
            .with_overrides(|key| std::env::var(key).ok());

            log::info!("App setup starting, backend={:?}", store_config.backend);

            let store = StoreState::new();
            // Manage state IMMEDIATELY, commands fail with `unavailable` until the store is ready
            app.manage(AppState {
                store: store.clone(),
                config: Mutex::new(store_config.clone()),
                config_path,
                db_path: db_path.clone(),
            });

            // Initialize store asynchronously in background
            tauri::async_runtime::spawn(async move {
                let connected = match store_config.validate() {
                    Ok(()) => repository::connect(&store_config, &db_path).await,
                    Err(e) => Err(e),
                };
                match connected {
                    Ok(repo) => {
                        store.install(repo).await;
                        let _ = rolling_logger::info("Store init success");
                        if let Err(e) = app_handle.emit("store-initialized", ()) {
                            log::error!("Failed to emit event: {}", e);
                        }
                    }
                    Err(e) => {
                        let _ = rolling_logger::error(&format!("Store init failed: {}", e));
                        let _ = app_handle.emit("store-failed", e.to_string());
                    }
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Pantry items
            commands::list_items,
            commands::increment_item,
            commands::decrement_item,
            commands::set_item_quantity,
            commands::remove_item,
            // Store configuration
            commands::get_store_config,
            commands::save_store_config,
            commands::recent_logs,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
