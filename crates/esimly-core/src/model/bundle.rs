// ── Catalog domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What kind of product a bundle delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ProductType {
    Epin,
    Esim,
    #[default]
    Bundle,
    Addon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BundleStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

/// A purchasable product. Read-only from the client's perspective --
/// stock and sold counts are server truth and only change via re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_type: ProductType,
    pub base_price: f64,
    pub stock_quantity: u32,
    pub sold_quantity: u32,
    pub status: BundleStatus,
}

impl Bundle {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    pub fn is_active(&self) -> bool {
        self.status == BundleStatus::Active
    }
}

/// An item the retailer already purchased (their inventory view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub product_name: Option<String>,
    pub product_type: ProductType,
    pub item_data: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<String>,
    pub purchased_at: Option<chrono::DateTime<chrono::Utc>>,
}
