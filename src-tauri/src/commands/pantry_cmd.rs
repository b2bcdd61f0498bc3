//! Tauri Commands for Pantry Items
//!
//! Exposes the pantry store operations to the frontend via Tauri IPC.
//! The frontend re-fetches with `list_items` after every mutation.

use tauri::State;
use crate::domain::{ItemName, PantryItem, Quantity};
use crate::AppState;
use super::CommandError;

/// List all items
#[tauri::command]
pub async fn list_items(state: State<'_, AppState>) -> Result<Vec<PantryItem>, CommandError> {
    let repo = state.store.repository().await?;
    let items = repo.list().await?;
    log::debug!("list_items -> {} items", items.len());
    Ok(items)
}

/// Add one unit, creating the item if needed
#[tauri::command]
pub async fn increment_item(state: State<'_, AppState>, name: String) -> Result<PantryItem, CommandError> {
    let name = ItemName::parse(&name)?;
    let repo = state.store.repository().await?;
    let item = repo.increment(&name).await?;
    log::info!("increment '{}' -> {}", name, item.count);
    Ok(item)
}

/// Remove one unit; the last unit deletes the item
#[tauri::command]
pub async fn decrement_item(state: State<'_, AppState>, name: String) -> Result<Option<PantryItem>, CommandError> {
    let name = ItemName::parse(&name)?;
    let repo = state.store.repository().await?;
    let item = repo.decrement(&name).await?;
    match &item {
        Some(i) => log::info!("decrement '{}' -> {}", name, i.count),
        None => log::info!("decrement '{}' -> removed or absent", name),
    }
    Ok(item)
}

/// Overwrite the quantity (upsert)
#[tauri::command]
pub async fn set_item_quantity(
    state: State<'_, AppState>,
    name: String,
    count: i64,
) -> Result<PantryItem, CommandError> {
    let name = ItemName::parse(&name)?;
    let count = Quantity::new(count)?;
    let repo = state.store.repository().await?;
    let item = repo.set_quantity(&name, count).await?;
    log::info!("set_quantity '{}' = {}", name, item.count);
    Ok(item)
}

/// Delete the item regardless of quantity
#[tauri::command]
pub async fn remove_item(state: State<'_, AppState>, name: String) -> Result<(), CommandError> {
    let name = ItemName::parse(&name)?;
    let repo = state.store.repository().await?;
    repo.remove(&name).await?;
    log::info!("remove '{}'", name);
    Ok(())
}
