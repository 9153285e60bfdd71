// ── Central reactive data store ──
//
// Snapshot storage for every entity the UI renders. Mutations are
// broadcast to subscribers via `watch` channels; consumers either take a
// cheap snapshot or subscribe for push updates. There is no local
// mutation of server-owned figures -- refreshes replace whole lists.

mod collection;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use collection::EntityCollection;

use crate::convert::RetailerCredit;
use crate::model::{
    Bundle, BusinessRegistration, Campaign, CreditLevel, CreditStatus, Enquiry, EsimRequest,
    InventoryItem, Promotion, StockItem, StockPool, User,
};
use crate::portal::ConnectionStatus;

/// Central reactive store for all esimly entities.
pub struct DataStore {
    pub(crate) bundles: EntityCollection<Bundle>,
    pub(crate) inventory: EntityCollection<InventoryItem>,
    pub(crate) users: EntityCollection<User>,
    pub(crate) registrations: EntityCollection<BusinessRegistration>,
    pub(crate) enquiries: EntityCollection<Enquiry>,
    pub(crate) stock_pools: EntityCollection<StockPool>,
    pub(crate) stock_items: EntityCollection<StockItem>,
    pub(crate) promotions: EntityCollection<Promotion>,
    pub(crate) campaigns: EntityCollection<Campaign>,
    pub(crate) esim_requests: EntityCollection<EsimRequest>,
    pub(crate) retailer_credits: EntityCollection<RetailerCredit>,

    pub(crate) credit_status: watch::Sender<Option<Arc<CreditStatus>>>,
    pub(crate) credit_levels: watch::Sender<Arc<Vec<CreditLevel>>>,
    pub(crate) analytics: watch::Sender<Option<Arc<serde_json::Value>>>,
    pub(crate) connection: watch::Sender<ConnectionStatus>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (credit_status, _) = watch::channel(None);
        let (credit_levels, _) = watch::channel(Arc::new(Vec::new()));
        let (analytics, _) = watch::channel(None);
        let (connection, _) = watch::channel(ConnectionStatus::Unknown);
        let (last_refresh, _) = watch::channel(None);

        Self {
            bundles: EntityCollection::new(),
            inventory: EntityCollection::new(),
            users: EntityCollection::new(),
            registrations: EntityCollection::new(),
            enquiries: EntityCollection::new(),
            stock_pools: EntityCollection::new(),
            stock_items: EntityCollection::new(),
            promotions: EntityCollection::new(),
            campaigns: EntityCollection::new(),
            esim_requests: EntityCollection::new(),
            retailer_credits: EntityCollection::new(),
            credit_status,
            credit_levels,
            analytics,
            connection,
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn bundles_snapshot(&self) -> Arc<Vec<Arc<Bundle>>> {
        self.bundles.snapshot()
    }

    pub fn inventory_snapshot(&self) -> Arc<Vec<Arc<InventoryItem>>> {
        self.inventory.snapshot()
    }

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    pub fn registrations_snapshot(&self) -> Arc<Vec<Arc<BusinessRegistration>>> {
        self.registrations.snapshot()
    }

    pub fn enquiries_snapshot(&self) -> Arc<Vec<Arc<Enquiry>>> {
        self.enquiries.snapshot()
    }

    pub fn stock_pools_snapshot(&self) -> Arc<Vec<Arc<StockPool>>> {
        self.stock_pools.snapshot()
    }

    pub fn stock_items_snapshot(&self) -> Arc<Vec<Arc<StockItem>>> {
        self.stock_items.snapshot()
    }

    pub fn promotions_snapshot(&self) -> Arc<Vec<Arc<Promotion>>> {
        self.promotions.snapshot()
    }

    pub fn campaigns_snapshot(&self) -> Arc<Vec<Arc<Campaign>>> {
        self.campaigns.snapshot()
    }

    pub fn esim_requests_snapshot(&self) -> Arc<Vec<Arc<EsimRequest>>> {
        self.esim_requests.snapshot()
    }

    pub fn retailer_credits_snapshot(&self) -> Arc<Vec<Arc<RetailerCredit>>> {
        self.retailer_credits.snapshot()
    }

    pub fn credit_status_snapshot(&self) -> Option<Arc<CreditStatus>> {
        self.credit_status.borrow().clone()
    }

    pub fn credit_levels_snapshot(&self) -> Arc<Vec<CreditLevel>> {
        self.credit_levels.borrow().clone()
    }

    pub fn analytics_snapshot(&self) -> Option<Arc<serde_json::Value>> {
        self.analytics.borrow().clone()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        *self.connection.borrow()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn bundle_by_id(&self, id: &str) -> Option<Arc<Bundle>> {
        self.bundles.get(id)
    }

    pub fn user_by_id(&self, id: &str) -> Option<Arc<User>> {
        self.users.get(id)
    }

    pub fn stock_pool_by_id(&self, id: &str) -> Option<Arc<StockPool>> {
        self.stock_pools.get(id)
    }

    pub fn esim_request_by_id(&self, id: &str) -> Option<Arc<EsimRequest>> {
        self.esim_requests.get(id)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_bundles(&self) -> watch::Receiver<Arc<Vec<Arc<Bundle>>>> {
        self.bundles.subscribe()
    }

    pub fn subscribe_inventory(&self) -> watch::Receiver<Arc<Vec<Arc<InventoryItem>>>> {
        self.inventory.subscribe()
    }

    pub fn subscribe_users(&self) -> watch::Receiver<Arc<Vec<Arc<User>>>> {
        self.users.subscribe()
    }

    pub fn subscribe_registrations(&self) -> watch::Receiver<Arc<Vec<Arc<BusinessRegistration>>>> {
        self.registrations.subscribe()
    }

    pub fn subscribe_enquiries(&self) -> watch::Receiver<Arc<Vec<Arc<Enquiry>>>> {
        self.enquiries.subscribe()
    }

    pub fn subscribe_stock_pools(&self) -> watch::Receiver<Arc<Vec<Arc<StockPool>>>> {
        self.stock_pools.subscribe()
    }

    pub fn subscribe_stock_items(&self) -> watch::Receiver<Arc<Vec<Arc<StockItem>>>> {
        self.stock_items.subscribe()
    }

    pub fn subscribe_promotions(&self) -> watch::Receiver<Arc<Vec<Arc<Promotion>>>> {
        self.promotions.subscribe()
    }

    pub fn subscribe_campaigns(&self) -> watch::Receiver<Arc<Vec<Arc<Campaign>>>> {
        self.campaigns.subscribe()
    }

    pub fn subscribe_esim_requests(&self) -> watch::Receiver<Arc<Vec<Arc<EsimRequest>>>> {
        self.esim_requests.subscribe()
    }

    pub fn subscribe_credit_status(&self) -> watch::Receiver<Option<Arc<CreditStatus>>> {
        self.credit_status.subscribe()
    }

    pub fn subscribe_credit_levels(&self) -> watch::Receiver<Arc<Vec<CreditLevel>>> {
        self.credit_levels.subscribe()
    }

    pub fn subscribe_connection(&self) -> watch::Receiver<ConnectionStatus> {
        self.connection.subscribe()
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // ── Bulk clear (offline / logout) ────────────────────────────────

    /// Empty every collection and scalar slot. Used when the
    /// connectivity probe fails (the admin surface shows explicit
    /// empty-states rather than stale data) and on logout.
    pub fn clear_all(&self) {
        self.bundles.clear();
        self.inventory.clear();
        self.users.clear();
        self.registrations.clear();
        self.enquiries.clear();
        self.stock_pools.clear();
        self.stock_items.clear();
        self.promotions.clear();
        self.campaigns.clear();
        self.esim_requests.clear();
        self.retailer_credits.clear();
        self.credit_status.send_replace(None);
        self.credit_levels.send_replace(Arc::new(Vec::new()));
        self.analytics.send_replace(None);
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
