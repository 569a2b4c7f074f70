//! File-backed certificate store
//!
//! Keys live under `<root>/<location>/<name>/<thumbprint>.pem`, mirroring
//! the (store location × store name) selectors of platform certificate
//! stores. A PEM file may hold a PKCS#8 private key (usable) or only a
//! public key (resolves, but is reported as lacking a private key).
//!
//! ## Root Resolution Order
//!
//! 1. `SEALCFG_STORE_ROOT` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/sealcfg/store` or
//!    `~/.config/sealcfg/store`
//! 3. Windows: `%APPDATA%\sealcfg\store`

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{SealError, SealResult};
use crate::keystore::handle::RsaKeyHandle;

/// Certificate store location selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum StoreLocation {
    /// Per-user store
    CurrentUser,
    /// Machine-wide store
    LocalMachine,
}

/// Certificate store name selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum StoreName {
    /// Personal certificates
    My,
    /// Trusted root certificates
    Root,
    /// Intermediate certification authorities
    Ca,
    /// Directly trusted people
    TrustedPeople,
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentUser => write!(f, "CurrentUser"),
            Self::LocalMachine => write!(f, "LocalMachine"),
        }
    }
}

impl FromStr for StoreLocation {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "currentuser" => Ok(Self::CurrentUser),
            "localmachine" => Ok(Self::LocalMachine),
            _ => Err(SealError::Config(format!("Unknown store location: {}", s))),
        }
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::My => write!(f, "My"),
            Self::Root => write!(f, "Root"),
            Self::Ca => write!(f, "Ca"),
            Self::TrustedPeople => write!(f, "TrustedPeople"),
        }
    }
}

impl FromStr for StoreName {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "my" => Ok(Self::My),
            "root" => Ok(Self::Root),
            "ca" => Ok(Self::Ca),
            "trustedpeople" => Ok(Self::TrustedPeople),
            _ => Err(SealError::Config(format!("Unknown store name: {}", s))),
        }
    }
}

/// Directory-backed key store
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    root: PathBuf,
}

impl FileKeyStore {
    /// Open the store at the default root
    ///
    /// Resolution: `SEALCFG_STORE_ROOT` env var, else the platform
    /// config directory (see module docs).
    pub fn new() -> SealResult<Self> {
        let root = if let Ok(custom) = std::env::var("SEALCFG_STORE_ROOT") {
            PathBuf::from(custom)
        } else {
            resolve_default_root()?
        };
        Ok(Self { root })
    }

    /// Open a store at a custom root (useful for testing)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one (location, name) store
    pub fn store_dir(&self, location: StoreLocation, name: StoreName) -> PathBuf {
        self.root.join(location.to_string()).join(name.to_string())
    }

    /// Resolve a thumbprint to a usable key handle
    ///
    /// The thumbprint is matched case-insensitively against the PEM file
    /// stems in the selected store. A matching entry that holds only a
    /// public key fails with `NoPrivateKey`; no match at all fails with
    /// `CertificateNotFound`.
    pub fn resolve(
        &self,
        thumbprint: &str,
        location: StoreLocation,
        name: StoreName,
    ) -> SealResult<RsaKeyHandle> {
        if thumbprint.is_empty() || !thumbprint.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SealError::Config(format!(
                "Thumbprint must be a hex string, got: {}",
                thumbprint
            )));
        }

        let dir = self.store_dir(location, name);
        if dir.is_dir() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if !is_pem_file(&path) {
                    continue;
                }
                let stem = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) => stem,
                    None => continue,
                };
                if !stem.eq_ignore_ascii_case(thumbprint) {
                    continue;
                }

                let pem = std::fs::read_to_string(&path)?;
                if pem.contains("PRIVATE KEY") {
                    return RsaKeyHandle::from_pkcs8_pem(&pem);
                }
                return Err(SealError::NoPrivateKey {
                    thumbprint: thumbprint.to_string(),
                });
            }
        }

        Err(SealError::CertificateNotFound {
            thumbprint: thumbprint.to_string(),
            store_location: location.to_string(),
            store_name: name.to_string(),
        })
    }

    /// List thumbprints of usable keys in one store
    ///
    /// Only entries whose key passes a wrap/unwrap self-check are
    /// reported, so the listing shows exactly the certificates that can
    /// both encrypt and decrypt.
    pub fn list(&self, location: StoreLocation, name: StoreName) -> SealResult<Vec<String>> {
        let dir = self.store_dir(location, name);
        let mut thumbprints = Vec::new();

        if dir.is_dir() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if !is_pem_file(&path) {
                    continue;
                }
                let stem = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) => stem.to_string(),
                    None => continue,
                };
                let pem = std::fs::read_to_string(&path)?;
                if !pem.contains("PRIVATE KEY") {
                    continue;
                }
                if let Ok(handle) = RsaKeyHandle::from_pkcs8_pem(&pem) {
                    if handle.self_check() {
                        thumbprints.push(stem);
                    }
                }
            }
        }

        thumbprints.sort();
        Ok(thumbprints)
    }
}

fn is_pem_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("pem")
}

/// Resolve the default store root based on platform
#[cfg(not(windows))]
fn resolve_default_root() -> SealResult<PathBuf> {
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME").map(|home| PathBuf::from(home).join(".config"))
        })
        .map_err(|_| SealError::Config("Could not determine home directory".into()))?;
    Ok(config_base.join("sealcfg").join("store"))
}

/// Resolve the default store root based on platform
#[cfg(windows)]
fn resolve_default_root() -> SealResult<PathBuf> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| SealError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("sealcfg").join("store"))
}
