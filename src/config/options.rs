//! Encrypted configuration source options
//!
//! Every setting has a direct value and an optional `*_env` companion
//! naming an environment variable. When the companion is set and the
//! variable exists, the environment wins; otherwise the direct value is
//! used. This lets deployments selectively override file-baked options
//! without rebuilding.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{SealError, SealResult};
use crate::keystore::{StoreLocation, StoreName};

/// Options describing one encrypted configuration source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOptions {
    /// Path of the encrypted configuration file
    pub path: Option<PathBuf>,
    /// Environment variable holding the file path
    pub path_env: Option<String>,

    /// Thumbprint of the decryption certificate (case-insensitive hex)
    pub thumbprint: Option<String>,
    /// Environment variable holding the thumbprint
    pub thumbprint_env: Option<String>,

    /// Certificate store location to search
    pub store_location: Option<StoreLocation>,
    /// Environment variable holding the store location
    pub store_location_env: Option<String>,

    /// Certificate store name to search
    pub store_name: Option<StoreName>,
    /// Environment variable holding the store name
    pub store_name_env: Option<String>,

    /// Whether a missing configuration file is tolerated
    #[serde(default)]
    pub optional: bool,
    /// Environment variable holding the optional flag
    pub optional_env: Option<String>,
}

/// Options after environment overrides and validation
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub path: PathBuf,
    pub thumbprint: String,
    pub store_location: StoreLocation,
    pub store_name: StoreName,
    pub optional: bool,
}

impl ConfigOptions {
    /// Apply environment overrides and validate
    ///
    /// Path and thumbprint are required once overrides are applied;
    /// store location defaults to `LocalMachine` and store name to `My`,
    /// the conventional home for service certificates.
    pub fn resolve(&self) -> SealResult<ResolvedOptions> {
        let path = env_override(&self.path_env)
            .map(PathBuf::from)
            .or_else(|| self.path.clone())
            .ok_or_else(|| SealError::Config("No configuration file path given".into()))?;

        let thumbprint = env_override(&self.thumbprint_env)
            .or_else(|| self.thumbprint.clone())
            .ok_or_else(|| SealError::Config("No certificate thumbprint given".into()))?;

        let store_location = match env_override(&self.store_location_env) {
            Some(raw) => raw.parse()?,
            None => self.store_location.unwrap_or(StoreLocation::LocalMachine),
        };

        let store_name = match env_override(&self.store_name_env) {
            Some(raw) => raw.parse()?,
            None => self.store_name.unwrap_or(StoreName::My),
        };

        let optional = match env_override(&self.optional_env) {
            Some(raw) => raw.parse().map_err(|_| {
                SealError::Config(format!("Invalid boolean for optional flag: {}", raw))
            })?,
            None => self.optional,
        };

        Ok(ResolvedOptions {
            path,
            thumbprint,
            store_location,
            store_name,
            optional,
        })
    }
}

/// Value of the named environment variable, if a name was given and the
/// variable is set
fn env_override(name: &Option<String>) -> Option<String> {
    name.as_deref().and_then(|n| std::env::var(n).ok())
}
