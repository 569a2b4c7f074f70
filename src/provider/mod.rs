//! Encrypted configuration provider
//!
//! The startup-side consumer of the envelope codec: reads an encrypted
//! file, decrypts it with the certificate named in the options, and
//! flattens the JSON document into the `:`-separated key/value map
//! convention used by layered configuration systems
//! (`"Logging:Level" = "Warn"`, arrays by index).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::ResolvedOptions;
use crate::crypto::envelope;
use crate::error::{SealError, SealResult};
use crate::keystore::FileKeyStore;

/// Load and decrypt one encrypted configuration source
///
/// A missing file is fatal unless the source is marked optional, in
/// which case an empty map is returned. Decrypt failures always
/// propagate; a tampered or unreadable config must never be silently
/// skipped.
pub fn load(
    options: &ResolvedOptions,
    store: &FileKeyStore,
) -> SealResult<BTreeMap<String, String>> {
    let bytes = match std::fs::read(&options.path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && options.optional => {
            return Ok(BTreeMap::new());
        }
        Err(e) => {
            return Err(SealError::Io(format!(
                "Failed to read {}: {}",
                options.path.display(),
                e
            )));
        }
    };

    let handle = store.resolve(
        &options.thumbprint,
        options.store_location,
        options.store_name,
    )?;
    let text = envelope::decrypt(&bytes, &handle)?;
    parse_flat(&text)
}

/// Flatten a JSON configuration document into key/value pairs
///
/// The root must be an object. Nested objects contribute `:`-joined
/// key segments, arrays contribute their index, scalars become their
/// display text, and `null` becomes the empty string.
pub fn parse_flat(text: &str) -> SealResult<BTreeMap<String, String>> {
    let root: Value = serde_json::from_str(text)?;
    if !root.is_object() {
        return Err(SealError::Json(
            "Top-level JSON element must be an object".to_string(),
        ));
    }

    let mut data = BTreeMap::new();
    flatten(&root, String::new(), &mut data);
    Ok(data)
}

fn flatten(value: &Value, prefix: String, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}:{}", prefix, key)
                };
                flatten(child, child_prefix, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, format!("{}:{}", prefix, index), out);
            }
        }
        Value::Null => {
            out.insert(prefix, String::new());
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}
