// Authentication endpoints
//
// Session issuance, registration, email verification, and password reset.
// None of these retry; a network failure surfaces as a single error for
// the caller to present.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::types::{
    BusinessRegistrationDto, LoginResponseDto, PersonalRegistrationDto, ResetPasswordDto,
    SessionUserDto,
};

impl ApiClient {
    /// Authenticate with email + password.
    ///
    /// `POST /auth/login` -- returns the session user and bearer token.
    /// The token is NOT installed on the client automatically; the session
    /// store owns that decision.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponseDto, Error> {
        let url = self.api_url("auth/login");
        debug!(email, "logging in");
        let value = self
            .post(
                url,
                &json!({
                    "email": email,
                    "password": password.expose_secret(),
                }),
            )
            .await?;
        envelope::extract_object(value, &["session"])
    }

    /// Register a personal account.
    ///
    /// `POST /auth/register/personal` -- does not log in; the caller
    /// navigates to a "verify your email" flow. Returns the backend's
    /// confirmation message when present.
    pub async fn register_personal(
        &self,
        registration: &PersonalRegistrationDto,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url("auth/register/personal");
        debug!(email = %registration.email, "registering personal account");
        let value = self.post(url, registration).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Register a business (retailer) account.
    ///
    /// `POST /auth/register/business` -- lands in the admin approval
    /// queue; no auto-login.
    pub async fn register_business(
        &self,
        registration: &BusinessRegistrationDto,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url("auth/register/business");
        debug!(email = %registration.email, "registering business account");
        let value = self.post(url, registration).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Verify the installed bearer token and fetch the current user.
    ///
    /// `GET /auth/verify` -- used by the session store's background
    /// rehydration probe.
    pub async fn verify_session(&self) -> Result<SessionUserDto, Error> {
        let url = self.api_url("auth/verify");
        self.get_object(url, &["user"]).await
    }

    /// Confirm an email address from a verification link.
    ///
    /// `GET /auth/verify-email?token&email&_t` -- `cache_bust` defeats
    /// intermediary caching of the one-shot link. A failure whose message
    /// mentions expiry is reclassified as [`Error::TokenExpired`] so the
    /// caller can offer a resend instead of a dead end.
    pub async fn verify_email(
        &self,
        token: &str,
        email: &str,
        cache_bust: i64,
    ) -> Result<Option<String>, Error> {
        let mut url = self.api_url("auth/verify-email");
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("email", email)
            .append_pair("_t", &cache_bust.to_string());
        debug!(email, "verifying email");

        match self.get(url).await {
            Ok(value) => Ok(envelope::extract_message(&value)),
            Err(Error::Api { message, .. }) if message.to_lowercase().contains("expired") => {
                Err(Error::TokenExpired { message })
            }
            Err(e) => Err(e),
        }
    }

    /// Re-send the verification email.
    ///
    /// `POST /auth/resend-verification`
    pub async fn resend_verification(&self, email: &str) -> Result<Option<String>, Error> {
        let url = self.api_url("auth/resend-verification");
        debug!(email, "resending verification email");
        let value = self.post(url, &json!({ "email": email })).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Start a password reset.
    ///
    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, Error> {
        let url = self.api_url("auth/forgot-password");
        debug!(email, "requesting password reset");
        let value = self.post(url, &json!({ "email": email })).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Complete a password reset with the emailed token.
    ///
    /// `POST /auth/reset-password`
    pub async fn reset_password(&self, reset: &ResetPasswordDto) -> Result<Option<String>, Error> {
        let url = self.api_url("auth/reset-password");
        debug!(email = %reset.email, "resetting password");
        let value = self.post(url, reset).await?;
        Ok(envelope::extract_message(&value))
    }
}
