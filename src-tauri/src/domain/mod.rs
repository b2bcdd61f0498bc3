//! Domain Layer
//!
//! Contains the pantry entity, its boundary validation and the error taxonomy.

mod error;
mod item;

pub use error::{DomainError, DomainResult};
pub use item::{ItemName, PantryItem, Quantity};
