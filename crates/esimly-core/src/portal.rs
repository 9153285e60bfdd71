// ── Portal facade ──
//
// Central entry point for UI consumers. Owns the shared ApiClient, the
// SessionStore, and the DataStore, and implements the two dashboard
// refresh policies:
//
//  * retailer: four parallel fetches, each degrading independently -- a
//    failing endpoint renders as empty without blocking its siblings;
//  * admin: connectivity probe first (HTTP 401 counts as "server up,
//    unauthenticated", not "down"), then five parallel fetches with the
//    same per-endpoint degradation; a probe failure empties every list
//    and flips the store's connection flag so the UI can distinguish
//    "backend unreachable" from "no data".
//
// Mutations never patch local state: each one re-fetches the affected
// list so credit/stock figures cannot drift from server truth.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use esimly_api::ApiClient;
use esimly_api::admin::StockKind;
use esimly_api::types::{BulkUploadMetaDto, UserUpdateDto};

use crate::convert::RetailerCredit;
use crate::error::CoreError;
use crate::model::{
    Bundle, BusinessRegistration, Campaign, CreditLevel, CreditStatus, Enquiry, EsimRequest,
    EsimRequestStatus, InventoryItem, Promotion, StockItem, StockPool, User,
};
use crate::session::SessionStore;
use crate::store::DataStore;
use crate::validate;

/// Backend reachability as last observed by the admin probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

/// Upper bound on how long any dashboard may show its loading
/// indicator. This bounds the *indicator* only -- in-flight requests are
/// not aborted, and a late response still lands in the store.
pub const LOADING_FAILSAFE: Duration = Duration::from_secs(10);

/// How long a purchase success banner stays up before auto-dismissing.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(5);

/// Outcome of a successful purchase, shown in the banner.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub order_id: Option<String>,
    pub total_price: Option<f64>,
    pub message: Option<String>,
}

/// The main entry point for consumers. Cheaply cloneable.
#[derive(Clone)]
pub struct Portal {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    store: Arc<DataStore>,
}

impl Portal {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            store: Arc::new(DataStore::new()),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    // ── Retailer dashboard ───────────────────────────────────────────

    /// Refresh the retailer dashboard: bundles, credit status, credit
    /// levels, and inventory in parallel, sharing the one bearer token.
    /// Partial-failure policy: each response is guarded independently and
    /// defaults to empty/None, so one failing endpoint never blanks the
    /// others.
    pub async fn refresh_retailer(&self) {
        let (bundles_res, status_res, levels_res, inventory_res) = tokio::join!(
            self.api.retailer_bundles(),
            self.api.credit_status(),
            self.api.credit_levels(),
            self.api.retailer_inventory(),
        );

        let bundles = ok_or_default("retailer/bundles", bundles_res);
        self.store.bundles.replace_all(
            bundles
                .into_iter()
                .map(|dto| (dto.id.clone(), Bundle::from(dto)))
                .collect(),
        );

        match status_res {
            Ok(dto) => {
                self.store
                    .credit_status
                    .send_replace(Some(Arc::new(CreditStatus::from(dto))));
            }
            Err(e) => {
                warn!(error = %e, "retailer/credit-status fetch failed (non-fatal)");
                self.store.credit_status.send_replace(None);
            }
        }

        let levels = ok_or_default("retailer/credit-levels", levels_res);
        self.store.credit_levels.send_replace(Arc::new(
            levels.into_iter().map(CreditLevel::from).collect(),
        ));

        let inventory = ok_or_default("retailer/inventory", inventory_res);
        self.store.inventory.replace_all(
            inventory
                .into_iter()
                .map(|dto| (dto.id.clone(), InventoryItem::from(dto)))
                .collect(),
        );

        self.store.last_refresh.send_replace(Some(Utc::now()));
        debug!(
            bundles = self.store.bundle_count(),
            "retailer refresh complete"
        );
    }

    /// Purchase `quantity` units of a bundle on credit.
    ///
    /// Quantity is validated against the cached stock count before the
    /// POST (a UX convenience -- the server is the authority and a race
    /// surfaces as a `Rejected` error carrying its message). On success
    /// the entire dashboard is re-fetched rather than locally patched,
    /// so displayed credit/stock can never drift from the ledger.
    pub async fn purchase(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<PurchaseOutcome, CoreError> {
        let bundle = self
            .store
            .bundle_by_id(product_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "bundle".into(),
                identifier: product_id.to_owned(),
            })?;

        if quantity < 1 || quantity > bundle.stock_quantity {
            return Err(CoreError::validation(
                "quantity",
                format!(
                    "must be between 1 and {} (requested {quantity})",
                    bundle.stock_quantity
                ),
            ));
        }

        let receipt = self.api.purchase(product_id, quantity).await?;

        // Full re-fetch, not a local patch.
        self.refresh_retailer().await;

        Ok(PurchaseOutcome {
            order_id: receipt.order_id,
            total_price: receipt.total_price,
            message: receipt.message,
        })
    }

    // ── Admin dashboard ──────────────────────────────────────────────

    /// Refresh the admin dashboard.
    ///
    /// A connectivity probe runs first; if the backend is unreachable
    /// every list is emptied and the connection flag goes `Offline` so
    /// the UI shows a banner instead of a misleading "no data" state.
    /// HTTP 401 from the probe means "server up but unauthenticated" and
    /// is surfaced as an authentication error, not offline.
    pub async fn refresh_admin(&self) -> Result<(), CoreError> {
        match self.api.admin_bundles().await {
            Ok(_) => {}
            Err(esimly_api::Error::Authentication { message }) => {
                // Server is up; the session is what's broken.
                self.store.connection.send_replace(ConnectionStatus::Online);
                return Err(CoreError::AuthenticationFailed { message });
            }
            Err(e) if matches!(e, esimly_api::Error::Transport(_) | esimly_api::Error::Tls(_)) => {
                warn!(error = %e, "admin connectivity probe failed, marking offline");
                self.store.clear_all();
                self.store
                    .connection
                    .send_replace(ConnectionStatus::Offline);
                return Ok(());
            }
            Err(e) => {
                // Server answered, however unhappily -- still online.
                debug!(error = %e, "admin probe returned an API error (treating as online)");
            }
        }
        self.store.connection.send_replace(ConnectionStatus::Online);

        let (users_res, registrations_res, enquiries_res, analytics_res, bundles_res) = tokio::join!(
            self.api.admin_users(),
            self.api.admin_business_registrations(),
            self.api.admin_enquiries(),
            self.api.admin_analytics(),
            self.api.admin_bundles(),
        );

        let users = ok_or_default("admin/users", users_res);
        self.store.users.replace_all(
            users
                .into_iter()
                .map(|dto| (dto.id.clone(), User::from(dto)))
                .collect(),
        );

        let registrations = ok_or_default("admin/business-registrations", registrations_res);
        self.store.registrations.replace_all(
            registrations
                .into_iter()
                .map(|dto| (dto.id.clone(), BusinessRegistration::from(dto)))
                .collect(),
        );

        let enquiries = ok_or_default("admin/enquiries", enquiries_res);
        self.store.enquiries.replace_all(
            enquiries
                .into_iter()
                .map(|dto| (dto.id.clone(), Enquiry::from(dto)))
                .collect(),
        );

        match analytics_res {
            Ok(value) => {
                self.store.analytics.send_replace(Some(Arc::new(value)));
            }
            Err(e) => {
                warn!(error = %e, "admin/analytics fetch failed (non-fatal)");
                self.store.analytics.send_replace(None);
            }
        }

        let bundles = ok_or_default("admin/bundles", bundles_res);
        self.store.bundles.replace_all(
            bundles
                .into_iter()
                .map(|dto| (dto.id.clone(), Bundle::from(dto)))
                .collect(),
        );

        self.store.last_refresh.send_replace(Some(Utc::now()));
        debug!(
            users = self.store.user_count(),
            bundles = self.store.bundle_count(),
            "admin refresh complete"
        );
        Ok(())
    }

    /// Re-fetch just the user list (after a user mutation).
    pub async fn refresh_users(&self) -> Result<(), CoreError> {
        let users = self.api.admin_users().await?;
        self.store.users.replace_all(
            users
                .into_iter()
                .map(|dto| (dto.id.clone(), User::from(dto)))
                .collect(),
        );
        Ok(())
    }

    // ── Admin: user lifecycle ────────────────────────────────────────
    //
    // Same shape for every action: mutate, then re-fetch the list. No
    // optimistic UI, no undo.

    pub async fn approve_user(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let message = self.api.approve_user(user_id).await?;
        self.refresh_users().await?;
        Ok(message)
    }

    pub async fn reject_user(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let message = self.api.reject_user(user_id).await?;
        self.refresh_users().await?;
        Ok(message)
    }

    pub async fn suspend_user(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let message = self.api.suspend_user(user_id).await?;
        self.refresh_users().await?;
        Ok(message)
    }

    pub async fn activate_user(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let message = self.api.activate_user(user_id).await?;
        self.refresh_users().await?;
        Ok(message)
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        update: &UserUpdateDto,
    ) -> Result<Option<String>, CoreError> {
        let message = self.api.update_user(user_id, update).await?;
        self.refresh_users().await?;
        Ok(message)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let message = self.api.delete_user(user_id).await?;
        self.refresh_users().await?;
        Ok(message)
    }

    // ── Admin: retailer credit ───────────────────────────────────────

    pub async fn refresh_retailer_credits(&self) -> Result<(), CoreError> {
        let credits = self.api.retailer_credit_limits().await?;
        self.store.retailer_credits.replace_all(
            credits
                .into_iter()
                .map(|dto| (dto.user_id.clone(), RetailerCredit::from(dto)))
                .collect(),
        );
        Ok(())
    }

    pub async fn set_credit_limit(
        &self,
        user_id: &str,
        credit_limit: f64,
    ) -> Result<Option<String>, CoreError> {
        let message = self.api.set_credit_limit(user_id, credit_limit).await?;
        self.refresh_retailer_credits().await?;
        Ok(message)
    }

    // ── Admin: eSIM approval queue ───────────────────────────────────

    /// Fetch the queue for one status filter and store it.
    pub async fn refresh_esim_requests(
        &self,
        status: Option<EsimRequestStatus>,
    ) -> Result<(), CoreError> {
        let filter = status.map(|s| s.to_string());
        let requests = self.api.esim_requests(filter.as_deref()).await?;
        self.store.esim_requests.replace_all(
            requests
                .into_iter()
                .map(|dto| (dto.id.clone(), EsimRequest::from(dto)))
                .collect(),
        );
        Ok(())
    }

    pub async fn approve_esim_request(
        &self,
        request_id: &str,
        active_filter: Option<EsimRequestStatus>,
    ) -> Result<Option<String>, CoreError> {
        let message = self.api.approve_esim_request(request_id).await?;
        self.refresh_esim_requests(active_filter).await?;
        Ok(message)
    }

    /// Reject with a free-text reason. A blank or whitespace-only reason
    /// is refused before any network call.
    pub async fn reject_esim_request(
        &self,
        request_id: &str,
        reason: &str,
        active_filter: Option<EsimRequestStatus>,
    ) -> Result<Option<String>, CoreError> {
        validate::rejection_reason(reason)?;
        let message = self
            .api
            .reject_esim_request(request_id, reason.trim())
            .await?;
        self.refresh_esim_requests(active_filter).await?;
        Ok(message)
    }

    // ── Admin: stock ─────────────────────────────────────────────────

    /// Refresh pools and the flattened item list. Items are fetched
    /// per-pool and flattened client-side; a failing pool degrades to
    /// missing items rather than failing the whole refresh.
    pub async fn refresh_stock(&self) -> Result<(), CoreError> {
        let pools = self.api.stock_pools().await?;

        let mut flattened: Vec<(String, StockItem)> = Vec::new();
        for pool in &pools {
            match self.api.stock_pool_items(&pool.id).await {
                Ok(items) => {
                    flattened.extend(
                        items
                            .into_iter()
                            .map(|dto| (dto.item_id.clone(), StockItem::from(dto))),
                    );
                }
                Err(e) => {
                    warn!(pool = %pool.id, error = %e, "pool item fetch failed (non-fatal)");
                }
            }
        }

        self.store.stock_pools.replace_all(
            pools
                .into_iter()
                .map(|dto| (dto.id.clone(), StockPool::from(dto)))
                .collect(),
        );
        self.store.stock_items.replace_all(flattened);
        Ok(())
    }

    /// Bulk-upload a CSV of PINs or eSIMs, then re-fetch stock.
    pub async fn bulk_upload(
        &self,
        kind: StockKind,
        file_name: &str,
        csv_bytes: Vec<u8>,
        meta: &BulkUploadMetaDto,
    ) -> Result<Option<String>, CoreError> {
        validate::require("poolName", &meta.pool_name)?;
        if meta.total_stock == 0 {
            return Err(CoreError::validation("totalStock", "must be at least 1"));
        }
        if meta.price <= 0.0 {
            return Err(CoreError::validation("price", "must be greater than zero"));
        }

        let message = self
            .api
            .bulk_upload(kind, file_name, csv_bytes, meta)
            .await?;
        self.refresh_stock().await?;
        Ok(message)
    }

    /// Download the CSV template for a stock family as ready-to-save
    /// CSV text (the server defines the schema as JSON).
    pub async fn template_csv(&self, kind: StockKind) -> Result<String, CoreError> {
        let template = self.api.stock_template(kind).await?;
        Ok(crate::csvutil::template_to_csv(&template))
    }

    // ── Admin: promotions & campaigns ────────────────────────────────

    pub async fn refresh_promotions(&self) -> Result<(), CoreError> {
        let promotions = self.api.promotions().await?;
        self.store.promotions.replace_all(
            promotions
                .into_iter()
                .map(|dto| {
                    let promotion = Promotion::from(dto);
                    (
                        promotion.id.clone().unwrap_or_else(|| promotion.name.clone()),
                        promotion,
                    )
                })
                .collect(),
        );
        Ok(())
    }

    pub async fn save_promotion(&self, promotion: Promotion) -> Result<Option<String>, CoreError> {
        validate::require("name", &promotion.name)?;
        let id = promotion.id.clone();
        let dto = promotion.into();
        let message = match id {
            Some(ref id) => self.api.update_promotion(id, &dto).await?,
            None => self.api.create_promotion(&dto).await?,
        };
        self.refresh_promotions().await?;
        Ok(message)
    }

    pub async fn delete_promotion(&self, id: &str) -> Result<Option<String>, CoreError> {
        let message = self.api.delete_promotion(id).await?;
        self.refresh_promotions().await?;
        Ok(message)
    }

    pub async fn refresh_campaigns(&self) -> Result<(), CoreError> {
        let campaigns = self.api.campaigns().await?;
        self.store.campaigns.replace_all(
            campaigns
                .into_iter()
                .map(|dto| {
                    let campaign = Campaign::from(dto);
                    (
                        campaign.id.clone().unwrap_or_else(|| campaign.name.clone()),
                        campaign,
                    )
                })
                .collect(),
        );
        Ok(())
    }

    pub async fn save_campaign(&self, campaign: Campaign) -> Result<Option<String>, CoreError> {
        validate::require("name", &campaign.name)?;
        let id = campaign.id.clone();
        let dto = campaign.into();
        let message = match id {
            Some(ref id) => self.api.update_campaign(id, &dto).await?,
            None => self.api.create_campaign(&dto).await?,
        };
        self.refresh_campaigns().await?;
        Ok(message)
    }

    pub async fn delete_campaign(&self, id: &str) -> Result<Option<String>, CoreError> {
        let message = self.api.delete_campaign(id).await?;
        self.refresh_campaigns().await?;
        Ok(message)
    }
}

/// Degrade a failed list fetch to its empty default, with a warning.
/// This is the partial-failure policy in one place.
fn ok_or_default<T: Default>(endpoint: &str, result: Result<T, esimly_api::Error>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(endpoint, error = %e, "fetch failed, degrading to empty (non-fatal)");
            T::default()
        }
    }
}
