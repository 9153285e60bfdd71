// Admin eSIM approval-queue endpoints
//
// The queue is status-filtered server-side; transitions are issued here
// and the caller re-fetches the active filter's list afterwards.

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::types::EsimRequestDto;

impl ApiClient {
    /// List eSIM activation requests, optionally filtered by status
    /// ("PENDING", "APPROVED", "REJECTED").
    ///
    /// `GET /admin/esim-requests?status=`
    pub async fn esim_requests(&self, status: Option<&str>) -> Result<Vec<EsimRequestDto>, Error> {
        let mut url = self.api_url("admin/esim-requests");
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status);
        }
        self.get_list(url, &["requests", "esimRequests"]).await
    }

    /// Approve a pending request; the backend assigns an eSIM serial.
    ///
    /// `POST /admin/esim-requests/{id}/approve`
    pub async fn approve_esim_request(&self, request_id: &str) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/esim-requests/{request_id}/approve"));
        debug!(request_id, "approving eSIM request");
        let value = self.post_empty(url).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Reject a pending request with a free-text reason.
    ///
    /// `POST /admin/esim-requests/{id}/reject` with body `{reason}`.
    /// The reason must be non-blank -- callers validate before reaching
    /// this method, which trusts its input.
    pub async fn reject_esim_request(
        &self,
        request_id: &str,
        reason: &str,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/esim-requests/{request_id}/reject"));
        debug!(request_id, "rejecting eSIM request");
        let value = self.post(url, &json!({ "reason": reason })).await?;
        Ok(envelope::extract_message(&value))
    }
}
