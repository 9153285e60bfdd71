// Admin retailer-credit endpoints
//
// Credit limits are set here and enforced entirely server-side; the
// ledger itself never reaches this client.

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::types::RetailerCreditDto;

impl ApiClient {
    /// List retailers with their credit limits and usage.
    ///
    /// `GET /admin/retailers/credit-limits`
    pub async fn retailer_credit_limits(&self) -> Result<Vec<RetailerCreditDto>, Error> {
        let url = self.api_url("admin/retailers/credit-limits");
        self.get_list(url, &["retailers", "creditLimits"]).await
    }

    /// Set a retailer's credit limit.
    ///
    /// `POST /admin/retailers/credit-limit` with `{userId, creditLimit}`.
    pub async fn set_credit_limit(
        &self,
        user_id: &str,
        credit_limit: f64,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url("admin/retailers/credit-limit");
        debug!(user_id, credit_limit, "setting credit limit");
        let value = self
            .post(
                url,
                &json!({
                    "userId": user_id,
                    "creditLimit": credit_limit,
                }),
            )
            .await?;
        Ok(envelope::extract_message(&value))
    }
}
