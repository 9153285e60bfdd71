//! Shared command plumbing: context construction, role guards, and the
//! confirmation prompt.

use std::sync::Arc;

use esimly_config::FileVault;
use esimly_core::guard;
use esimly_core::session::SessionStore;
use esimly_core::{ApiClient, Portal, Role};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command handler needs.
pub struct Context {
    pub portal: Portal,
    pub profile_name: String,
    /// Public storefront origin, for activation URLs.
    pub storefront_origin: String,
}

/// Build the portal for the active profile and rehydrate the persisted
/// session (optimistically -- a stale token surfaces as a 401 on the
/// first protected call, mirroring the storefront's behavior).
pub fn build_context(global: &GlobalOpts) -> Result<Context, CliError> {
    let config = esimly_config::load_config_or_default();
    let (profile_name, profile) =
        esimly_config::resolve_profile(&config, global.profile.as_deref())?;

    let base_url = esimly_config::profile_api_url(profile)?;
    let transport = esimly_config::profile_transport(profile, &config.defaults);
    let api = Arc::new(
        ApiClient::new(base_url, &transport)
            .map_err(|e| CliError::from_core(e.into(), &profile_name))?,
    );

    let vault = FileVault::new(profile_name.clone());
    let session = Arc::new(SessionStore::new(Arc::clone(&api), Box::new(vault)));
    session.hydrate();

    let portal = Portal::new(api, session);

    Ok(Context {
        portal,
        profile_name,
        storefront_origin: profile.storefront_origin.clone(),
    })
}

/// Guard: the session must carry the ADMIN role.
pub fn require_admin(ctx: &Context) -> Result<(), CliError> {
    guard::require_role_strict(&ctx.portal.session().state(), Role::Admin)
        .map_err(|e| CliError::from_core(e, &ctx.profile_name))
}

/// Guard: the session must carry the BUSINESS role.
pub fn require_business(ctx: &Context) -> Result<(), CliError> {
    guard::require_role_strict(&ctx.portal.session().state(), Role::Business)
        .map_err(|e| CliError::from_core(e, &ctx.profile_name))
}

/// Explicit confirmation before a mutating action. `--yes` bypasses.
pub fn confirm(global: &GlobalOpts, prompt: &str) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Other {
            message: format!("prompt failed: {e}"),
        })
}

/// Map a core error into a CLI error with the active profile attached.
pub fn core_err(ctx: &Context) -> impl Fn(esimly_core::CoreError) -> CliError + '_ {
    move |e| CliError::from_core(e, &ctx.profile_name)
}
