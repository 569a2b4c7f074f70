//! Certificate listing command
//!
//! Lists the certificates in a store that can actually service the
//! envelope codec, proven by a full encrypt/decrypt round trip rather
//! than by the key merely existing.

use std::path::PathBuf;

use crate::crypto::envelope;
use crate::error::SealResult;
use crate::keystore::{FileKeyStore, StoreLocation, StoreName};

/// List usable certificates in one store
pub fn handle_certs_command(
    location: StoreLocation,
    name: StoreName,
    store_root: Option<PathBuf>,
) -> SealResult<()> {
    let store = match store_root {
        Some(root) => FileKeyStore::with_root(root),
        None => FileKeyStore::new()?,
    };

    let mut usable = Vec::new();
    for thumbprint in store.list(location, name)? {
        // prove the key end to end, the same check an operator's
        // encrypt-then-decrypt would hit
        if let Ok(handle) = store.resolve(&thumbprint, location, name) {
            let works = envelope::encrypt("test", &handle)
                .and_then(|bytes| envelope::decrypt(&bytes, &handle))
                .map(|text| text == "test")
                .unwrap_or(false);
            if works {
                usable.push(thumbprint);
            }
        }
    }

    println!("Certificates in {}/{}:", location, name);
    if usable.is_empty() {
        println!("  (none with a usable private key)");
    }
    for thumbprint in usable {
        println!("  {}", thumbprint);
    }
    Ok(())
}
