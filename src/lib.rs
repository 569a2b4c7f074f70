//! sealcfg - Certificate-bound encryption for configuration files
//!
//! This library protects sensitive configuration data at rest by sealing
//! a text payload (typically JSON) into a signed, key-wrapped envelope
//! that only the holder of a specific certificate's private key can open.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: the envelope codec, bulk cipher, and key-material derivation
//! - `keystore`: certificate store lookup and asymmetric key handles
//! - `config`: encrypted-source options with environment overrides
//! - `provider`: startup-side loader that decrypts and flattens a config file
//! - `cli`: command handlers for the `sealcfg` binary
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use sealcfg::crypto::envelope;
//! use sealcfg::keystore::{FileKeyStore, StoreLocation, StoreName};
//!
//! let store = FileKeyStore::new()?;
//! let handle = store.resolve("AB12CD34", StoreLocation::CurrentUser, StoreName::My)?;
//! let sealed = envelope::encrypt("{\"ApiKey\":\"secret\"}", &handle)?;
//! let text = envelope::decrypt(&sealed, &handle)?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keystore;
pub mod provider;

pub use error::{SealError, SealResult};
