//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging
//! the clap argument parsing with the codec, keystore, and provider
//! layers.

pub mod certs;
pub mod files;

pub use certs::handle_certs_command;
pub use files::{
    handle_decrypt_command, handle_edit_command, handle_encrypt_command, handle_show_command,
    CertSelector,
};
