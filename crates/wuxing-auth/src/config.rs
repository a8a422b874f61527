//! Authentication configuration: the shared salt and validity window.

use std::path::Path;

use serde::Deserialize;

/// Configuration for code generation and verification.
///
/// One `AuthConfig` per server process. The salt must match between the
/// process that issues a code and the process that verifies it — in a
/// multi-process deployment it is a shared secret, not a per-node value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Secret salt mixed into every code seed. Override in production;
    /// anyone holding the salt can mint valid codes for any identity.
    pub salt: String,

    /// How long (in seconds) an issued code stays valid.
    ///
    /// Default: 300 (five minutes). The window is the only thing standing
    /// between a 6-digit code space and brute force, so keep it short.
    pub window_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            salt: "WuxingSecretSalt".to_string(),
            window_secs: 300,
        }
    }
}

impl AuthConfig {
    /// Loads configuration from a JSON file, falling back to defaults.
    ///
    /// A missing or unreadable file is not an error — the server must come
    /// up with a usable (if default-salted) configuration either way. The
    /// outcome is logged so a misconfigured deployment is visible.
    pub fn load_from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Self>(&raw) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "loaded auth config");
                    config
                }
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "auth config file is malformed, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::info!(
                    path = %path.display(),
                    error = %e,
                    "no auth config file, using defaults"
                );
                Self::default()
            }
        }
    }
}
