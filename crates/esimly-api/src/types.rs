// Wire types for the storefront backend.
//
// These mirror backend JSON (camelCase) as faithfully as possible and stay
// tolerant of absent optional fields -- the backend omits nulls freely.
// Canonical domain types live in `esimly-core`; nothing here should leak
// past the conversion layer.

use serde::{Deserialize, Serialize};

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserDto {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// "PERSONAL" or "BUSINESS".
    #[serde(default)]
    pub account_type: Option<String>,
    /// "USER", "BUSINESS", or "ADMIN".
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseDto {
    pub user: SessionUserDto,
    pub token: String,
}

/// Personal-account registration payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRegistrationDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Business-account registration payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRegistrationDto {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordDto {
    pub token: String,
    pub email: String,
    pub new_password: String,
}

// ── Catalog ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "EPIN", "ESIM", "BUNDLE", or "ADDON".
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub sold_quantity: u32,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStatisticsDto {
    #[serde(default)]
    pub total_bundles: u64,
    #[serde(default)]
    pub active_bundles: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_units_sold: u64,
}

// ── Retailer credit ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLevelDto {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub next_level: Option<String>,
    #[serde(default)]
    pub next_level_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditStatusDto {
    #[serde(default)]
    pub credit_limit: f64,
    #[serde(default)]
    pub available_credit: f64,
    #[serde(default)]
    pub used_credit: f64,
    #[serde(default)]
    pub usage_percentage: f64,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub needs_warning: bool,
    #[serde(default)]
    pub current_level: Option<CurrentLevelDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLevelDto {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub credit_limit: Option<f64>,
    #[serde(default)]
    pub is_current_level: bool,
    /// Locked levels render greyed out in the ladder.
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemDto {
    pub id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub item_data: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purchased_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceiptDto {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Admin: users ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Editable subset for `PUT /admin/users/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRegistrationRecordDto {
    pub id: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Admin: stock ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPoolDto {
    pub id: String,
    pub name: String,
    /// "EPIN" or "ESIM".
    #[serde(default)]
    pub stock_type: Option<String>,
    #[serde(default)]
    pub total_quantity: u32,
    #[serde(default)]
    pub available_quantity: u32,
    #[serde(default)]
    pub used_quantity: u32,
    #[serde(default)]
    pub reserved_quantity: u32,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemDto {
    pub item_id: String,
    /// Decrypted PIN / eSIM activation code. Decryption happens
    /// server-side before transmission.
    #[serde(default)]
    pub item_data: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    /// "AVAILABLE", "ASSIGNED", or "USED".
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pool_id: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Metadata accompanying a bulk CSV upload.
#[derive(Debug, Clone)]
pub struct BulkUploadMetaDto {
    pub pool_name: String,
    pub total_stock: u32,
    pub price: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTemplateDto {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub example: Vec<Vec<String>>,
}

// ── Admin: promotions & campaigns ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "PERCENTAGE" or "FIXED".
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub discount_value: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: Option<u32>,
    /// Base64 data URL when an image was uploaded.
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reward_type: Option<String>,
    #[serde(default)]
    pub reward_value: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// ── Admin: eSIM approvals ───────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsimRequestDto {
    pub id: String,
    /// "PENDING", "APPROVED", or "REJECTED".
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer_full_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub id_type: Option<String>,
    #[serde(default)]
    pub assigned_esim_serial: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Admin: retailer credit ──────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailerCreditDto {
    pub user_id: String,
    #[serde(default)]
    pub business_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub credit_limit: f64,
    #[serde(default)]
    pub used_credit: f64,
    #[serde(default)]
    pub level: Option<String>,
}

