//! Reactive data layer between `esimly-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the session lifecycle, domain model, and client-side
//! business rules for the esimly workspace:
//!
//! - **[`SessionStore`]** — The single source of truth for "who is logged
//!   in". Hydrates optimistically from persisted state, corrects itself
//!   after a background token-verification probe, and broadcasts every
//!   transition through a `watch` channel so route guards and screens
//!   react to login/logout.
//!
//! - **[`Portal`]** — Central facade over the backend API: parallel
//!   dashboard refreshes with per-endpoint degradation, purchase and
//!   admin mutations that re-fetch authoritative state instead of
//!   patching locally, and the connectivity probe for the admin surface.
//!
//! - **[`DataStore`]** — Watch-channel snapshot storage. Consumers take
//!   cheap `Arc` snapshots or subscribe for push-based updates.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Bundle`,
//!   `CreditStatus`, `StockPool`, `EsimRequest`, etc.) converted once at
//!   the API boundary from the backend's wire shapes.
//!
//! - **Client-side rules** — form validation ([`validate`]), catalog
//!   filtering and quantity clamping ([`catalog`]), CSV helpers
//!   ([`csvutil`]), banner-image encoding ([`media`]), eSIM activation
//!   artifacts ([`activation`]), and overview statistics ([`stats`]).

pub mod activation;
pub mod catalog;
pub mod convert;
pub mod csvutil;
pub mod error;
pub mod guard;
pub mod media;
pub mod model;
pub mod portal;
pub mod session;
pub mod stats;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use esimly_api::admin::StockKind;
pub use esimly_api::types::{BulkUploadMetaDto, UserUpdateDto};
pub use esimly_api::{ApiClient, TransportConfig};

pub use catalog::{PriceFilter, QuantityPicker};
pub use error::CoreError;
pub use guard::{GuardDecision, require_role};
pub use portal::{ConnectionStatus, Portal};
pub use session::{PersistedSession, Session, SessionState, SessionStore, SessionVault};
pub use store::DataStore;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AccountType, Bundle, BundleStatistics, BusinessRegistration, Campaign, CreditLevel,
    CreditStatus, Enquiry, EsimRequest, EsimRequestStatus, InventoryItem, ItemStatus, ProductType,
    Promotion, Role, StockItem, StockPool, StockType, User, UserStatus,
};
