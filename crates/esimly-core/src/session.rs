// ── Session store ──
//
// Single source of truth for "who is logged in" across every consumer.
// The state machine is `Loading → Authenticated | Unauthenticated`,
// broadcast through a watch channel so route guards and screens react to
// transitions without polling.
//
// Rehydration is optimistic-then-correct: a persisted user+token pair
// flips the state to Authenticated BEFORE any network round-trip (no
// loading flash on startup), and the background verification probe
// logs the session out again if the backend rejects the token. The cost
// is a brief window where a stale session appears valid.

use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, warn};

use esimly_api::ApiClient;
use esimly_api::types::{BusinessRegistrationDto, PersonalRegistrationDto, ResetPasswordDto};

use crate::error::CoreError;
use crate::model::User;
use crate::validate;

// ── State ───────────────────────────────────────────────────────────

/// An authenticated session: the user plus the bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: SecretString,
}

/// Observable session lifecycle.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Startup, before [`SessionStore::hydrate`] has run.
    #[default]
    Loading,
    Authenticated(Arc<Session>),
    Unauthenticated,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

// ── Persistence ─────────────────────────────────────────────────────

/// What survives a restart: the cached user and the opaque bearer token.
/// Both are written and cleared together.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PersistedSession {
    pub user: User,
    pub token: String,
}

/// Where the persisted session lives. The production vault (config dir
/// file + OS keyring for the token) is provided by `esimly-config`;
/// tests and ephemeral sessions use [`MemoryVault`].
pub trait SessionVault: Send + Sync {
    fn load(&self) -> Result<Option<PersistedSession>, CoreError>;
    fn store(&self, session: &PersistedSession) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-memory vault: nothing survives the process.
#[derive(Default)]
pub struct MemoryVault {
    inner: std::sync::Mutex<Option<PersistedSession>>,
}

impl SessionVault for MemoryVault {
    fn load(&self) -> Result<Option<PersistedSession>, CoreError> {
        Ok(self.inner.lock().expect("vault lock poisoned").clone())
    }

    fn store(&self, session: &PersistedSession) -> Result<(), CoreError> {
        *self.inner.lock().expect("vault lock poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.inner.lock().expect("vault lock poisoned") = None;
        Ok(())
    }
}

// ── Registration forms ──────────────────────────────────────────────

/// Personal-account signup form. Validated client-side before the POST.
#[derive(Debug, Clone)]
pub struct PersonalSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
}

/// Business (retailer) signup form.
#[derive(Debug, Clone)]
pub struct BusinessSignup {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    pub registration_number: String,
}

// ── Store ───────────────────────────────────────────────────────────

/// The injectable session object. Owns the persisted state, the bearer
/// token installed on the shared [`ApiClient`], and the observable
/// [`SessionState`].
pub struct SessionStore {
    api: Arc<ApiClient>,
    vault: Box<dyn SessionVault>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(api: Arc<ApiClient>, vault: Box<dyn SessionVault>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self { api, vault, state }
    }

    /// Subscribe to session transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The current session, if authenticated.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.state.borrow().session().cloned()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Rehydrate from the vault. Synchronous: a persisted user+token pair
    /// makes the state `Authenticated` immediately, before any network
    /// traffic. Returns `true` when a session was restored -- the caller
    /// should then run [`verify_rehydrated`](Self::verify_rehydrated) in
    /// the background to correct an invalid token.
    pub fn hydrate(&self) -> bool {
        let persisted = match self.vault.load() {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "session vault unreadable, starting signed out");
                None
            }
        };

        match persisted {
            Some(p) => {
                debug!(user = %p.user.email, "restored persisted session (unverified)");
                let session = Arc::new(Session {
                    user: p.user,
                    token: SecretString::from(p.token),
                });
                self.api.set_token(session.token.clone());
                self.state
                    .send_replace(SessionState::Authenticated(session));
                true
            }
            None => {
                self.state.send_replace(SessionState::Unauthenticated);
                false
            }
        }
    }

    /// Background probe after [`hydrate`](Self::hydrate): ask the backend
    /// whether the restored token is still good. Any non-2xx answer logs
    /// the session out; a transport failure (backend unreachable) leaves
    /// the optimistic session in place rather than punishing offline
    /// starts.
    pub async fn verify_rehydrated(&self) {
        match self.api.verify_session().await {
            Ok(user_dto) => {
                debug!("session token verified");
                self.patch_user(move |user| *user = User::from(user_dto));
            }
            Err(esimly_api::Error::Transport(e)) => {
                warn!(error = %e, "verification probe unreachable, keeping session");
            }
            Err(e) => {
                warn!(error = %e, "session token rejected, signing out");
                self.logout();
            }
        }
    }

    /// Authenticate and persist the session. Inputs are validated before
    /// any network call: an invalid email or empty password never reaches
    /// the wire.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        use secrecy::ExposeSecret;

        let email = email.trim();
        validate::email(email)?;
        validate::password_present(password.expose_secret())?;

        let response = self.api.login(email, password).await?;
        let user = User::from(response.user);
        let session = Arc::new(Session {
            user: user.clone(),
            token: SecretString::from(response.token.clone()),
        });

        self.api.set_token(session.token.clone());
        if let Err(e) = self.vault.store(&PersistedSession {
            user,
            token: response.token,
        }) {
            warn!(error = %e, "failed to persist session (continuing in-memory)");
        }
        self.state
            .send_replace(SessionState::Authenticated(Arc::clone(&session)));
        Ok(session)
    }

    /// Clear the session: vault, bearer token, and state, together.
    /// No server call -- tokens are stateless.
    pub fn logout(&self) {
        if let Err(e) = self.vault.clear() {
            warn!(error = %e, "failed to clear session vault");
        }
        self.api.clear_token();
        self.state.send_replace(SessionState::Unauthenticated);
    }

    /// Local-only patch of the cached user (profile edits elsewhere).
    /// Re-persists so the next start sees the updated user.
    pub fn patch_user(&self, patch: impl FnOnce(&mut User)) {
        use secrecy::ExposeSecret;

        let Some(current) = self.session() else {
            return;
        };
        let mut user = current.user.clone();
        patch(&mut user);

        let session = Arc::new(Session {
            user: user.clone(),
            token: current.token.clone(),
        });
        if let Err(e) = self.vault.store(&PersistedSession {
            user,
            token: current.token.expose_secret().to_owned(),
        }) {
            warn!(error = %e, "failed to persist patched session");
        }
        self.state
            .send_replace(SessionState::Authenticated(session));
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Register a personal account. Does NOT log in -- the caller sends
    /// the user to the "verify your email" screen.
    pub async fn register_personal(&self, form: &PersonalSignup) -> Result<Option<String>, CoreError> {
        validate::require("firstName", &form.first_name)?;
        validate::require("lastName", &form.last_name)?;
        validate::email(&form.email)?;
        validate::new_password(&form.password)?;
        validate::passwords_match(&form.password, &form.confirm_password)?;
        validate::phone(&form.phone_number)?;

        let dto = PersonalRegistrationDto {
            first_name: form.first_name.trim().to_owned(),
            last_name: form.last_name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            password: form.password.clone(),
            phone_number: non_blank(&form.phone_number),
        };
        Ok(self.api.register_personal(&dto).await?)
    }

    /// Register a business account. Lands in the admin approval queue;
    /// no auto-login.
    pub async fn register_business(&self, form: &BusinessSignup) -> Result<Option<String>, CoreError> {
        validate::require("businessName", &form.business_name)?;
        validate::require("contactName", &form.contact_name)?;
        validate::email(&form.email)?;
        validate::new_password(&form.password)?;
        validate::passwords_match(&form.password, &form.confirm_password)?;
        validate::phone(&form.phone_number)?;

        let dto = BusinessRegistrationDto {
            business_name: form.business_name.trim().to_owned(),
            contact_name: form.contact_name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            password: form.password.clone(),
            phone_number: non_blank(&form.phone_number),
            registration_number: non_blank(&form.registration_number),
        };
        Ok(self.api.register_business(&dto).await?)
    }

    // ── Email verification & password reset ──────────────────────────

    /// Confirm an email address from a verification link. Both inputs are
    /// trimmed and validated before the call; the request carries a
    /// millisecond timestamp to defeat cached one-shot links. An expired
    /// token surfaces as [`CoreError::VerificationExpired`] so the UI can
    /// offer a resend.
    pub async fn verify_email(&self, token: &str, email: &str) -> Result<Option<String>, CoreError> {
        let token = token.trim();
        let email = email.trim();
        validate::require("token", token)?;
        validate::email(email)?;

        let cache_bust = Utc::now().timestamp_millis();
        Ok(self.api.verify_email(token, email, cache_bust).await?)
    }

    /// Re-send the verification email.
    pub async fn resend_verification(&self, email: &str) -> Result<Option<String>, CoreError> {
        let email = email.trim();
        validate::email(email)?;
        Ok(self.api.resend_verification(email).await?)
    }

    /// Start a password reset.
    pub async fn send_password_reset(&self, email: &str) -> Result<Option<String>, CoreError> {
        let email = email.trim();
        validate::email(email)?;
        Ok(self.api.forgot_password(email).await?)
    }

    /// Complete a password reset with the emailed token.
    pub async fn reset_password(
        &self,
        token: &str,
        email: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Option<String>, CoreError> {
        validate::require("token", token)?;
        validate::email(email)?;
        validate::new_password(new_password)?;
        validate::passwords_match(new_password, confirm_password)?;

        let dto = ResetPasswordDto {
            token: token.trim().to_owned(),
            email: email.trim().to_owned(),
            new_password: new_password.to_owned(),
        };
        Ok(self.api.reset_password(&dto).await?)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
