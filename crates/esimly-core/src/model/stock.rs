// ── Stock domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which family of stock a pool holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StockType {
    #[default]
    Epin,
    Esim,
}

/// Lifecycle of an individual stock item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ItemStatus {
    #[default]
    Available,
    Assigned,
    Used,
}

/// A named batch of PIN or eSIM records uploaded together via CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPool {
    pub id: String,
    pub name: String,
    pub stock_type: StockType,
    pub total_quantity: u32,
    pub available_quantity: u32,
    pub used_quantity: u32,
    pub reserved_quantity: u32,
    pub status: Option<String>,
}

/// An individual PIN / eSIM record. `item_data` arrives decrypted --
/// decryption is server-side and this client never handles key material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub item_id: String,
    pub item_data: Option<String>,
    pub serial_number: Option<String>,
    pub status: ItemStatus,
    pub pool_id: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}
