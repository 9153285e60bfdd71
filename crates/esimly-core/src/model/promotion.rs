// ── Promotion / campaign domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

/// A discount promotion. Most fields are optional form inputs; the
/// banner image, when set, is a base64 data URL embedded in the payload
/// (no object storage at this deployment's scale).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<u32>,
    pub used_count: Option<u32>,
    pub banner_image: Option<String>,
    pub status: Option<String>,
}

/// A reward campaign -- the promotion form's sibling, managed through
/// the same modal shell in the original UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub reward_type: Option<String>,
    pub reward_value: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub banner_image: Option<String>,
    pub status: Option<String>,
}
