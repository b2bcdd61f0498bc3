//! Pantry Commands
//!
//! Frontend bindings for pantry item backend commands.

use serde::Serialize;
use crate::models::{CommandError, PantryItem};
use super::call;

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct NameArgs<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct SetQuantityArgs<'a> {
    name: &'a str,
    count: i64,
}

// ========================
// Commands
// ========================

pub async fn list_items() -> Result<Vec<PantryItem>, CommandError> {
    call::<(), _>("list_items", None).await
}

pub async fn increment_item(name: &str) -> Result<PantryItem, CommandError> {
    call("increment_item", Some(&NameArgs { name })).await
}

/// Returns `None` when the last unit was taken (record deleted) or it was absent
pub async fn decrement_item(name: &str) -> Result<Option<PantryItem>, CommandError> {
    call("decrement_item", Some(&NameArgs { name })).await
}

pub async fn set_item_quantity(name: &str, count: i64) -> Result<PantryItem, CommandError> {
    call("set_item_quantity", Some(&SetQuantityArgs { name, count })).await
}

pub async fn remove_item(name: &str) -> Result<(), CommandError> {
    call("remove_item", Some(&NameArgs { name })).await
}
