//! Pantry Item Entity
//!
//! A named quantity in the pantry collection. The name is the document key.

use serde::{Deserialize, Serialize};
use super::error::{DomainError, DomainResult};

/// Longest document id the stores accept, in bytes
pub const MAX_NAME_BYTES: usize = 1500;

/// A pantry item as presented to the frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    /// Document key, case-sensitive
    pub name: String,
    /// Quantity on hand
    pub count: i64,
}

impl PantryItem {
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        Self { name: name.into(), count }
    }
}

/// A validated item name.
///
/// Stored exactly as entered; only rejected when it cannot serve as a
/// document id in every backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemName(String);

impl ItemName {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::InvalidInput("item name must not be empty".into()));
        }
        if raw.contains('/') {
            return Err(DomainError::InvalidInput(format!("item name '{}' must not contain '/'", raw)));
        }
        if raw == "." || raw == ".." {
            return Err(DomainError::InvalidInput(format!("'{}' is not a valid item name", raw)));
        }
        if raw.len() > MAX_NAME_BYTES {
            return Err(DomainError::InvalidInput(format!(
                "item name is {} bytes, limit is {}",
                raw.len(),
                MAX_NAME_BYTES
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated absolute quantity (non-negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(count: i64) -> DomainResult<Self> {
        if count < 0 {
            return Err(DomainError::InvalidInput(format!("quantity {} is negative", count)));
        }
        Ok(Self(count))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}
