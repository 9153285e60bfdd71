// Admin promotion & reward-campaign endpoints
//
// Two parallel CRUD families sharing one shape. Banner images arrive
// embedded as base64 data URLs inside the JSON payload (a deliberate
// simplification at this deployment's scale -- no object storage).

use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::types::{CampaignDto, PromotionDto};

impl ApiClient {
    /// List promotions. `GET /admin/promotions`
    pub async fn promotions(&self) -> Result<Vec<PromotionDto>, Error> {
        let url = self.api_url("admin/promotions");
        self.get_list(url, &["promotions"]).await
    }

    /// Create a promotion. `POST /admin/promotions`
    pub async fn create_promotion(
        &self,
        promotion: &PromotionDto,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url("admin/promotions");
        debug!(name = %promotion.name, "creating promotion");
        let value = self.post(url, promotion).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Update a promotion. `PUT /admin/promotions/{id}`
    pub async fn update_promotion(
        &self,
        id: &str,
        promotion: &PromotionDto,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/promotions/{id}"));
        debug!(id, "updating promotion");
        let value = self.put(url, promotion).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Delete a promotion. `DELETE /admin/promotions/{id}`
    pub async fn delete_promotion(&self, id: &str) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/promotions/{id}"));
        debug!(id, "deleting promotion");
        let value = self.delete(url).await?;
        Ok(envelope::extract_message(&value))
    }

    /// List reward campaigns. `GET /admin/rewards`
    pub async fn campaigns(&self) -> Result<Vec<CampaignDto>, Error> {
        let url = self.api_url("admin/rewards");
        self.get_list(url, &["rewards", "campaigns"]).await
    }

    /// Create a reward campaign. `POST /admin/rewards`
    pub async fn create_campaign(&self, campaign: &CampaignDto) -> Result<Option<String>, Error> {
        let url = self.api_url("admin/rewards");
        debug!(name = %campaign.name, "creating campaign");
        let value = self.post(url, campaign).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Update a reward campaign. `PUT /admin/rewards/{id}`
    pub async fn update_campaign(
        &self,
        id: &str,
        campaign: &CampaignDto,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/rewards/{id}"));
        debug!(id, "updating campaign");
        let value = self.put(url, campaign).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Delete a reward campaign. `DELETE /admin/rewards/{id}`
    pub async fn delete_campaign(&self, id: &str) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/rewards/{id}"));
        debug!(id, "deleting campaign");
        let value = self.delete(url).await?;
        Ok(envelope::extract_message(&value))
    }
}
