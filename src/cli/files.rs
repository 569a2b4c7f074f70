//! File encryption commands
//!
//! The editor role of sealcfg: encrypt a plaintext file into an
//! envelope, decrypt one back, edit an encrypted file in place via
//! `$EDITOR`, or show the flattened configuration view.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::crypto::envelope;
use crate::error::{SealError, SealResult};
use crate::keystore::{FileKeyStore, RsaKeyHandle, StoreLocation, StoreName};
use crate::provider;

/// Certificate selection shared by all file commands
#[derive(Args, Debug)]
pub struct CertSelector {
    /// Thumbprint of the certificate to use (case-insensitive hex)
    #[arg(short, long, env = "SEALCFG_THUMBPRINT")]
    pub thumbprint: String,

    /// Certificate store location to search
    #[arg(long, value_enum, env = "SEALCFG_STORE_LOCATION", default_value_t = StoreLocation::CurrentUser)]
    pub store_location: StoreLocation,

    /// Certificate store name to search
    #[arg(long, value_enum, env = "SEALCFG_STORE_NAME", default_value_t = StoreName::My)]
    pub store_name: StoreName,

    /// Override the key store root directory
    #[arg(long, env = "SEALCFG_STORE_ROOT")]
    pub store_root: Option<PathBuf>,
}

impl CertSelector {
    /// Open the key store this selector points at
    pub fn open_store(&self) -> SealResult<FileKeyStore> {
        match &self.store_root {
            Some(root) => Ok(FileKeyStore::with_root(root.clone())),
            None => FileKeyStore::new(),
        }
    }

    /// Resolve the selected certificate to a key handle
    pub fn resolve(&self) -> SealResult<RsaKeyHandle> {
        self.open_store()?
            .resolve(&self.thumbprint, self.store_location, self.store_name)
    }
}

/// Encrypt a plaintext file into an envelope
pub fn handle_encrypt_command(
    input: &Path,
    output: Option<&Path>,
    selector: &CertSelector,
) -> SealResult<()> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| SealError::Io(format!("Failed to read {}: {}", input.display(), e)))?;

    let handle = selector.resolve()?;
    let envelope_bytes = envelope::encrypt(&text, &handle)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));
    std::fs::write(&output, envelope_bytes)
        .map_err(|e| SealError::Io(format!("Failed to write {}: {}", output.display(), e)))?;

    println!("Encrypted {} -> {}", input.display(), output.display());
    Ok(())
}

/// Decrypt an envelope file
///
/// Writes to `output` when given, otherwise prints the plaintext to
/// stdout.
pub fn handle_decrypt_command(
    input: &Path,
    output: Option<&Path>,
    selector: &CertSelector,
) -> SealResult<()> {
    let bytes = std::fs::read(input)
        .map_err(|e| SealError::Io(format!("Failed to read {}: {}", input.display(), e)))?;

    let handle = selector.resolve()?;
    let text = envelope::decrypt(&bytes, &handle)?;

    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| {
                SealError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            println!("Decrypted {} -> {}", input.display(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Edit an encrypted file in place
///
/// Decrypts into a temporary file, opens `$VISUAL`/`$EDITOR`, and
/// re-encrypts the result back to the original path. If decryption
/// fails the edit is refused; if the editor leaves the text unchanged
/// nothing is rewritten.
pub fn handle_edit_command(path: &Path, selector: &CertSelector) -> SealResult<()> {
    let bytes = std::fs::read(path)
        .map_err(|e| SealError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let handle = selector.resolve()?;
    let original_text = envelope::decrypt(&bytes, &handle)?;

    // plaintext only ever touches a temp file that is removed on drop
    let mut scratch = tempfile::Builder::new()
        .prefix("sealcfg-edit-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| SealError::Io(format!("Failed to create temp file: {}", e)))?;
    scratch.write_all(original_text.as_bytes())?;
    scratch.flush()?;

    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());

    let status = std::process::Command::new(&editor)
        .arg(scratch.path())
        .status()
        .map_err(|e| SealError::Io(format!("Failed to launch editor {}: {}", editor, e)))?;
    if !status.success() {
        return Err(SealError::Io(format!(
            "Editor {} exited with {}",
            editor, status
        )));
    }

    let edited_text = std::fs::read_to_string(scratch.path())?;
    if edited_text == original_text {
        println!("No changes, {} left untouched", path.display());
        return Ok(());
    }

    let envelope_bytes = envelope::encrypt(&edited_text, &handle)?;
    std::fs::write(path, envelope_bytes)
        .map_err(|e| SealError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    println!("Re-encrypted {}", path.display());
    Ok(())
}

/// Decrypt a file and print its flattened configuration view
pub fn handle_show_command(input: &Path, selector: &CertSelector) -> SealResult<()> {
    let bytes = std::fs::read(input)
        .map_err(|e| SealError::Io(format!("Failed to read {}: {}", input.display(), e)))?;

    let handle = selector.resolve()?;
    let text = envelope::decrypt(&bytes, &handle)?;
    let data = provider::parse_flat(&text)?;

    for (key, value) in &data {
        println!("{} = {}", key, value);
    }
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".enc");
    PathBuf::from(name)
}
