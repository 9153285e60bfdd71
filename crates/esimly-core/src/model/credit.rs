// ── Retailer credit domain types ──
//
// Purely display data: every figure is computed server-side and the UI
// re-fetches after each purchase instead of doing local arithmetic, so
// displayed balances can never drift from the ledger.

use serde::{Deserialize, Serialize};

/// The retailer's current credit standing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditStatus {
    pub credit_limit: f64,
    pub available_credit: f64,
    pub used_credit: f64,
    pub usage_percentage: f64,
    pub is_blocked: bool,
    pub needs_warning: bool,
    pub current_level_name: Option<String>,
    pub current_level_description: Option<String>,
    pub next_level_name: Option<String>,
}

/// One rung of the credit-level ladder (BRONZE, SILVER, GOLD, ...).
///
/// The ladder is entirely server-derived, including which rung is
/// current and which are still locked -- no tier boundary is computed
/// client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditLevel {
    pub name: String,
    pub description: Option<String>,
    pub credit_limit: Option<f64>,
    pub is_current_level: bool,
    pub is_available: bool,
}
