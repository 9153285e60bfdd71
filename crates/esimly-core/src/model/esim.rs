// ── eSIM approval-queue domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status of an eSIM activation request. Transitions happen server-side;
/// this client only issues approve/reject and re-fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EsimRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsimRequest {
    pub id: String,
    pub status: EsimRequestStatus,
    pub customer_full_name: Option<String>,
    pub customer_email: Option<String>,
    pub id_number: Option<String>,
    pub id_type: Option<String>,
    pub assigned_esim_serial: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
