//! All possible UI actions. Actions are the sole mechanism for state
//! mutation -- screens dispatch them, the app loop routes them.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use esimly_core::model::{
    Bundle, BusinessRegistration, CreditLevel, CreditStatus, Enquiry, EsimRequest,
    EsimRequestStatus, StockItem, StockPool, User,
};
use esimly_core::{ConnectionStatus, SessionState};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification -- the non-blocking replacement for the
/// storefront's `alert()` dialogs.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }
}

/// Pending confirmation -- the explicit stand-in for `confirm()`.
/// Every destructive or mutating admin action passes through here.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    ApproveUser { id: String, name: String },
    RejectUser { id: String, name: String },
    SuspendUser { id: String, name: String },
    ActivateUser { id: String, name: String },
    DeleteUser { id: String, name: String },
    ApproveEsim { id: String, customer: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApproveUser { name, .. } => write!(f, "Approve {name}?"),
            Self::RejectUser { name, .. } => write!(f, "Reject {name}?"),
            Self::SuspendUser { name, .. } => write!(f, "Suspend {name}?"),
            Self::ActivateUser { name, .. } => write!(f, "Re-activate {name}?"),
            Self::DeleteUser { name, .. } => {
                write!(f, "Delete {name}? This cannot be undone.")
            }
            Self::ApproveEsim { customer, .. } => {
                write!(f, "Approve eSIM request for {customer}?")
            }
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Session ───────────────────────────────────────────────────
    SessionChanged(SessionState),
    SubmitLogin { email: String, password: SecretString },
    LoginFailed(String),
    Logout,

    // ── Data events (from the data bridge) ────────────────────────
    BundlesUpdated(Arc<Vec<Arc<Bundle>>>),
    CreditStatusUpdated(Option<Arc<CreditStatus>>),
    CreditLevelsUpdated(Arc<Vec<CreditLevel>>),
    UsersUpdated(Arc<Vec<Arc<User>>>),
    RegistrationsUpdated(Arc<Vec<Arc<BusinessRegistration>>>),
    EnquiriesUpdated(Arc<Vec<Arc<Enquiry>>>),
    StockPoolsUpdated(Arc<Vec<Arc<StockPool>>>),
    StockItemsUpdated(Arc<Vec<Arc<StockItem>>>),
    EsimRequestsUpdated(Arc<Vec<Arc<EsimRequest>>>),
    ConnectionChanged(ConnectionStatus),

    // ── Refresh requests (screens → app → portal task) ────────────
    RefreshRetailer,
    RefreshAdmin,
    RefreshStock,
    RefreshEsim(Option<EsimRequestStatus>),
    RefreshDone(ScreenId),

    // ── Purchase flow ─────────────────────────────────────────────
    SubmitPurchase { bundle_id: String, quantity: u32 },
    PurchaseSucceeded(String),
    PurchaseFailed(String),

    // ── Admin mutations ───────────────────────────────────────────
    RequestConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    RejectEsim { id: String, reason: String },

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
