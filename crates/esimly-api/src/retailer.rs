// Retailer (B2B) endpoints
//
// Catalog, credit standing, purchased inventory, and the purchase call
// itself. All require a BUSINESS session token.

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::types::{
    BundleDto, CreditLevelDto, CreditStatusDto, InventoryItemDto, PurchaseReceiptDto,
};

impl ApiClient {
    /// List bundles purchasable by the retailer.
    ///
    /// `GET /retailer/bundles`
    pub async fn retailer_bundles(&self) -> Result<Vec<BundleDto>, Error> {
        let url = self.api_url("retailer/bundles");
        self.get_list(url, &["bundles", "products"]).await
    }

    /// Current credit standing (limit, usage, tier).
    ///
    /// `GET /retailer/credit-status`
    pub async fn credit_status(&self) -> Result<CreditStatusDto, Error> {
        let url = self.api_url("retailer/credit-status");
        self.get_object(url, &["creditStatus", "status"]).await
    }

    /// The full credit-level ladder, with the current level flagged.
    ///
    /// `GET /retailer/credit-levels`
    pub async fn credit_levels(&self) -> Result<Vec<CreditLevelDto>, Error> {
        let url = self.api_url("retailer/credit-levels");
        self.get_list(url, &["creditLevels", "levels"]).await
    }

    /// Items the retailer has already purchased.
    ///
    /// `GET /retailer/inventory`
    pub async fn retailer_inventory(&self) -> Result<Vec<InventoryItemDto>, Error> {
        let url = self.api_url("retailer/inventory");
        self.get_list(url, &["inventory", "items"]).await
    }

    /// Purchase `quantity` units of a bundle on credit.
    ///
    /// `POST /retailer/purchase` with body `{productId, quantity}`.
    /// Quantity bounds are a client-side convenience only -- the server is
    /// the authority on stock and credit, and any race surfaces here as an
    /// `Error::Api` carrying the server's message.
    pub async fn purchase(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<PurchaseReceiptDto, Error> {
        let url = self.api_url("retailer/purchase");
        debug!(product_id, quantity, "purchasing bundle");
        let value = self
            .post(
                url,
                &json!({
                    "productId": product_id,
                    "quantity": quantity,
                }),
            )
            .await?;
        envelope::extract_object(value, &["order", "receipt"])
    }
}
