//! Shared configuration for the esimly CLI and TUI.
//!
//! TOML profiles (one per backend environment), figment file + env
//! loading, and the persistent session vault (config-dir file plus OS
//! keyring for the token). This crate is the single source of backend
//! base URLs -- no other crate hardcodes or environment-switches them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use esimly_core::session::{PersistedSession, SessionVault};
use esimly_core::{CoreError, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' (run `esimly config init`)")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is absent.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles (e.g. "production", "development").
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert("production".into(), Profile::production());
        profiles.insert("development".into(), Profile::development());
        Self {
            default_profile: Some("production".into()),
            defaults: Defaults::default(),
            profiles,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend API base URL.
    pub api_url: String,

    /// Public storefront origin, used to build eSIM activation URLs.
    /// Must match the origin printed on existing QR codes.
    pub storefront_origin: String,

    /// Accept self-signed certificates (development LAN backends).
    #[serde(default)]
    pub insecure: bool,

    /// Override request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Profile {
    fn production() -> Self {
        Self {
            api_url: "https://api.esimly.io".into(),
            storefront_origin: "https://shop.esimly.io".into(),
            insecure: false,
            timeout: None,
        }
    }

    fn development() -> Self {
        Self {
            api_url: "http://192.168.1.50:5000".into(),
            storefront_origin: "http://localhost:3000".into(),
            insecure: true,
            timeout: None,
        }
    }
}

// ── Config file paths ───────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the persisted session lives.
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("session.json"),
        |dirs| dirs.config_dir().join("session.json"),
    )
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "esimly", "esimly")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("esimly");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment (`ESIMLY_*` overrides).
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("ESIMLY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning the built-in defaults if the file is absent
/// or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick a profile by explicit name, falling back to `default_profile`.
pub fn resolve_profile<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = name
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "production".into());

    config
        .profiles
        .get(&name)
        .map(|p| (name.clone(), p))
        .ok_or(ConfigError::UnknownProfile { profile: name })
}

/// Build the transport settings for a profile.
pub fn profile_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    TransportConfig {
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        danger_accept_invalid_certs: profile.insecure,
    }
}

/// Parse and validate a profile's API base URL.
pub fn profile_api_url(profile: &Profile) -> Result<url::Url, ConfigError> {
    profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })
}

// ── Session vault ───────────────────────────────────────────────────

const KEYRING_SERVICE: &str = "esimly";

/// Production session vault: the cached user as JSON in the config dir,
/// the bearer token in the OS keyring with a plaintext-file fallback for
/// headless environments. Both are written and cleared together.
pub struct FileVault {
    path: PathBuf,
    profile: String,
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    user: esimly_core::User,
    /// Present only when the keyring was unavailable at store time.
    token: Option<String>,
}

impl FileVault {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            path: session_path(),
            profile: profile.into(),
        }
    }

    /// Vault rooted at an explicit path (tests).
    pub fn at_path(path: PathBuf, profile: impl Into<String>) -> Self {
        Self {
            path,
            profile: profile.into(),
        }
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &format!("{}/token", self.profile)).ok()
    }
}

impl SessionVault for FileVault {
    fn load(&self) -> Result<Option<PersistedSession>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::Storage(e.to_string())),
        };
        let file: SessionFile =
            serde_json::from_str(&raw).map_err(|e| CoreError::Storage(e.to_string()))?;

        // Keyring first, plaintext fallback second.
        let token = self
            .keyring_entry()
            .and_then(|entry| entry.get_password().ok())
            .or(file.token);

        Ok(token.map(|token| PersistedSession {
            user: file.user,
            token,
        }))
    }

    fn store(&self, session: &PersistedSession) -> Result<(), CoreError> {
        let keyring_ok = self
            .keyring_entry()
            .is_some_and(|entry| entry.set_password(&session.token).is_ok());
        if !keyring_ok {
            warn!("keyring unavailable, persisting token to session file");
        }

        let file = SessionFile {
            user: session.user.clone(),
            token: if keyring_ok {
                None
            } else {
                Some(session.token.clone())
            },
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::Storage(e.to_string()))?;
        }
        let raw =
            serde_json::to_string_pretty(&file).map_err(|e| CoreError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| CoreError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), CoreError> {
        if let Some(entry) = self.keyring_entry() {
            // Absent credentials are fine; anything else is worth a warning.
            if let Err(e) = entry.delete_credential() {
                if !matches!(e, keyring::Error::NoEntry) {
                    warn!(error = %e, "failed to remove token from keyring");
                }
            }
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use esimly_core::model::{AccountType, Role, User, UserStatus};

    use super::*;

    fn sample_user() -> User {
        User {
            id: "u1".into(),
            email: "a@b.c".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            account_type: AccountType::Personal,
            role: Role::User,
            status: UserStatus::Active,
            business_name: None,
            phone_number: None,
            created_at: None,
        }
    }

    #[test]
    fn default_config_has_both_environments() {
        let config = Config::default();
        assert!(config.profiles.contains_key("production"));
        assert!(config.profiles.contains_key("development"));
        let (name, _) = resolve_profile(&config, None).unwrap();
        assert_eq!(name, "production");
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            resolve_profile(&config, Some("staging")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn development_profile_tolerates_self_signed() {
        let config = Config::default();
        let (_, profile) = resolve_profile(&config, Some("development")).unwrap();
        let transport = profile_transport(profile, &config.defaults);
        assert!(transport.danger_accept_invalid_certs);
    }

    #[test]
    fn file_vault_round_trips_without_keyring() {
        let dir = tempfile::tempdir().unwrap();
        // A per-test profile name keeps keyring entries (if a keyring
        // exists on this machine) from colliding between runs.
        let vault = FileVault::at_path(dir.path().join("session.json"), "test-roundtrip");

        assert!(vault.load().unwrap().is_none());

        vault
            .store(&PersistedSession {
                user: sample_user(),
                token: "tok".into(),
            })
            .unwrap();
        let restored = vault.load().unwrap().unwrap();
        assert_eq!(restored.user.email, "a@b.c");
        assert_eq!(restored.token, "tok");

        vault.clear().unwrap();
        assert!(vault.load().unwrap().is_none());
    }
}
