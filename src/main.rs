use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sealcfg::cli::{
    handle_certs_command, handle_decrypt_command, handle_edit_command, handle_encrypt_command,
    handle_show_command, CertSelector,
};
use sealcfg::keystore::{StoreLocation, StoreName};

#[derive(Parser)]
#[command(
    name = "sealcfg",
    version,
    about = "Certificate-bound encryption for configuration files",
    long_about = "sealcfg seals configuration files into signed, key-wrapped \
                  envelopes that only the holder of a specific certificate's \
                  private key can open, and lets operators decrypt, edit, and \
                  re-encrypt them."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a plaintext file into an envelope
    Encrypt {
        /// File to encrypt
        file: PathBuf,
        /// Output path (defaults to <file>.enc)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        cert: CertSelector,
    },

    /// Decrypt an envelope file
    Decrypt {
        /// File to decrypt
        file: PathBuf,
        /// Output path (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        cert: CertSelector,
    },

    /// Decrypt, edit in $EDITOR, and re-encrypt a file in place
    Edit {
        /// Encrypted file to edit
        file: PathBuf,
        #[command(flatten)]
        cert: CertSelector,
    },

    /// Decrypt a file and print its flattened configuration view
    Show {
        /// Encrypted file to show
        file: PathBuf,
        #[command(flatten)]
        cert: CertSelector,
    },

    /// List certificates with a usable private key
    Certs {
        /// Certificate store location to search
        #[arg(long, value_enum, env = "SEALCFG_STORE_LOCATION", default_value_t = StoreLocation::CurrentUser)]
        store_location: StoreLocation,
        /// Certificate store name to search
        #[arg(long, value_enum, env = "SEALCFG_STORE_NAME", default_value_t = StoreName::My)]
        store_name: StoreName,
        /// Override the key store root directory
        #[arg(long, env = "SEALCFG_STORE_ROOT")]
        store_root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt { file, out, cert } => {
            handle_encrypt_command(&file, out.as_deref(), &cert)?;
        }
        Commands::Decrypt { file, out, cert } => {
            handle_decrypt_command(&file, out.as_deref(), &cert)?;
        }
        Commands::Edit { file, cert } => {
            handle_edit_command(&file, &cert)?;
        }
        Commands::Show { file, cert } => {
            handle_show_command(&file, &cert)?;
        }
        Commands::Certs {
            store_location,
            store_name,
            store_root,
        } => {
            handle_certs_command(store_location, store_name, store_root)?;
        }
    }

    Ok(())
}
