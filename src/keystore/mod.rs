//! Certificate store access for sealcfg
//!
//! Resolves a (thumbprint, store location, store name) selector to a key
//! handle exposing the asymmetric operations the envelope codec needs.
//! The concrete store is a directory of PEM files laid out like the
//! platform certificate stores it stands in for.

pub mod handle;
pub mod store;

pub use handle::{KeyHandle, RsaKeyHandle};
pub use store::{FileKeyStore, StoreLocation, StoreName};
