// Admin user-management endpoints
//
// User listing plus the approve/reject/suspend/activate lifecycle,
// business-registration queue, enquiries, and catalog views.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::types::{
    AdminUserDto, BundleDto, BundleStatisticsDto, BusinessRegistrationRecordDto, EnquiryDto,
    UserUpdateDto,
};

impl ApiClient {
    /// List all user accounts.
    ///
    /// `GET /admin/users`
    pub async fn admin_users(&self) -> Result<Vec<AdminUserDto>, Error> {
        let url = self.api_url("admin/users");
        self.get_list(url, &["users"]).await
    }

    /// List pending business registrations.
    ///
    /// `GET /admin/business-registrations`
    pub async fn admin_business_registrations(
        &self,
    ) -> Result<Vec<BusinessRegistrationRecordDto>, Error> {
        let url = self.api_url("admin/business-registrations");
        self.get_list(url, &["registrations", "businessRegistrations"])
            .await
    }

    /// List customer enquiries.
    ///
    /// `GET /admin/enquiries`
    pub async fn admin_enquiries(&self) -> Result<Vec<EnquiryDto>, Error> {
        let url = self.api_url("admin/enquiries");
        self.get_list(url, &["enquiries"]).await
    }

    /// The full product catalog as the admin sees it.
    ///
    /// `GET /admin/bundles`
    pub async fn admin_bundles(&self) -> Result<Vec<BundleDto>, Error> {
        let url = self.api_url("admin/bundles");
        self.get_list(url, &["bundles", "products"]).await
    }

    /// Aggregate sales figures for the catalog.
    ///
    /// `GET /admin/bundles/statistics`
    pub async fn admin_bundle_statistics(&self) -> Result<BundleStatisticsDto, Error> {
        let url = self.api_url("admin/bundles/statistics");
        self.get_object(url, &["statistics", "stats"]).await
    }

    /// Dashboard analytics. Shape varies per deployment; returned raw.
    ///
    /// `GET /admin/analytics`
    pub async fn admin_analytics(&self) -> Result<Value, Error> {
        let url = self.api_url("admin/analytics");
        self.get(url).await
    }

    // ── User lifecycle ───────────────────────────────────────────────

    /// Approve a pending account. `POST /admin/users/{id}/approve`
    pub async fn approve_user(&self, user_id: &str) -> Result<Option<String>, Error> {
        self.user_action(user_id, "approve").await
    }

    /// Reject a pending account. `POST /admin/users/{id}/reject`
    pub async fn reject_user(&self, user_id: &str) -> Result<Option<String>, Error> {
        self.user_action(user_id, "reject").await
    }

    /// Suspend an active account. `POST /admin/users/{id}/suspend`
    pub async fn suspend_user(&self, user_id: &str) -> Result<Option<String>, Error> {
        self.user_action(user_id, "suspend").await
    }

    /// Re-activate a suspended account. `POST /admin/users/{id}/activate`
    pub async fn activate_user(&self, user_id: &str) -> Result<Option<String>, Error> {
        self.user_action(user_id, "activate").await
    }

    async fn user_action(&self, user_id: &str, action: &str) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/users/{user_id}/{action}"));
        debug!(user_id, action, "user lifecycle action");
        let value = self.post_empty(url).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Update a user's editable fields.
    ///
    /// `PUT /admin/users/{id}`
    pub async fn update_user(
        &self,
        user_id: &str,
        update: &UserUpdateDto,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/users/{user_id}"));
        debug!(user_id, "updating user");
        let value = self.put(url, update).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Delete a user account.
    ///
    /// `DELETE /admin/users/{id}`
    pub async fn delete_user(&self, user_id: &str) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("admin/users/{user_id}"));
        debug!(user_id, "deleting user");
        let value = self.delete(url).await?;
        Ok(envelope::extract_message(&value))
    }
}
