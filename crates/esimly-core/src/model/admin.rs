// ── Admin back-office domain types ──

use serde::{Deserialize, Serialize};

/// A pending business (retailer) registration awaiting approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRegistration {
    pub id: String,
    pub business_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: String,
    pub status: Option<String>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A customer enquiry from the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregate catalog figures for the admin overview.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BundleStatistics {
    pub total_bundles: u64,
    pub active_bundles: u64,
    pub total_revenue: f64,
    pub total_units_sold: u64,
}
