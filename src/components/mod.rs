//! UI Components
//!
//! Reusable Leptos components.

mod modal;
mod search_bar;
mod pantry_table;
mod pantry_row;
mod add_item_modal;
mod edit_quantity_modal;
mod store_settings_modal;
mod notice_banner;

pub use modal::Modal;
pub use search_bar::SearchBar;
pub use pantry_table::PantryTable;
pub use pantry_row::PantryRow;
pub use add_item_modal::AddItemModal;
pub use edit_quantity_modal::EditQuantityModal;
pub use store_settings_modal::StoreSettingsModal;
pub use notice_banner::NoticeBanner;
