// ── User / account domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether an account is a consumer or a retailer (B2B) account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AccountType {
    #[default]
    Personal,
    Business,
}

/// Authorization role attached to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Business,
    Admin,
}

/// Account lifecycle status as managed by the admin back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum UserStatus {
    Pending,
    #[default]
    Active,
    Suspended,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: AccountType,
    pub role: Role,
    pub status: UserStatus,
    /// Set for BUSINESS accounts.
    pub business_name: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    /// Display name: "First Last", falling back to the business name or
    /// the email address.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            return full.to_owned();
        }
        self.business_name
            .clone()
            .unwrap_or_else(|| self.email.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_business(&self) -> bool {
        self.role == Role::Business || self.account_type == AccountType::Business
    }
}
