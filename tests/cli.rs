//! End-to-end tests for the sealcfg binary
//!
//! Each test builds a throwaway key store under a temp directory and
//! drives the CLI against real files.

use std::path::Path;
use std::sync::OnceLock;

use assert_cmd::Command;
use predicates::prelude::*;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use tempfile::TempDir;

const THUMB: &str = "DEADBEEF0001";

fn test_key_pem() -> &'static str {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, 2048)
            .expect("failed to generate test key")
            .to_pkcs8_pem(LineEnding::LF)
            .expect("failed to encode test key")
            .to_string()
    })
}

fn seed_store(root: &Path) {
    let dir = root.join("CurrentUser").join("My");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{}.pem", THUMB)), test_key_pem()).unwrap();
}

fn sealcfg() -> Command {
    Command::cargo_bin("sealcfg").unwrap()
}

#[test]
fn encrypt_then_decrypt_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let store_root = tmp.path().join("store");
    seed_store(&store_root);

    let plain = tmp.path().join("settings.json");
    std::fs::write(&plain, r#"{"A":"B"}"#).unwrap();

    sealcfg()
        .args(["encrypt", plain.to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .success();

    let sealed = tmp.path().join("settings.json.enc");
    assert!(sealed.exists());
    // ciphertext must not leak the plaintext
    let sealed_bytes = std::fs::read(&sealed).unwrap();
    assert!(!sealed_bytes.windows(9).any(|w| w == br#"{"A":"B"}"#));

    sealcfg()
        .args(["decrypt", sealed.to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"A":"B"}"#));
}

#[test]
fn decrypt_with_unknown_thumbprint_fails() {
    let tmp = TempDir::new().unwrap();
    let store_root = tmp.path().join("store");
    seed_store(&store_root);

    let plain = tmp.path().join("settings.json");
    std::fs::write(&plain, r#"{"A":"B"}"#).unwrap();

    sealcfg()
        .args(["encrypt", plain.to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .success();

    sealcfg()
        .args(["decrypt", tmp.path().join("settings.json.enc").to_str().unwrap()])
        .args(["--thumbprint", "0000000000"])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Certificate not found"));
}

#[test]
fn tampered_envelope_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let store_root = tmp.path().join("store");
    seed_store(&store_root);

    let plain = tmp.path().join("settings.json");
    std::fs::write(&plain, r#"{"Secret":"value"}"#).unwrap();

    sealcfg()
        .args(["encrypt", plain.to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .success();

    let sealed = tmp.path().join("settings.json.enc");
    let mut bytes = std::fs::read(&sealed).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x01;
    std::fs::write(&sealed, bytes).unwrap();

    sealcfg()
        .args(["decrypt", sealed.to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Signature verification failed"));
}

#[test]
fn show_prints_flattened_config() {
    let tmp = TempDir::new().unwrap();
    let store_root = tmp.path().join("store");
    seed_store(&store_root);

    let plain = tmp.path().join("settings.json");
    std::fs::write(&plain, r#"{"Db":{"Host":"localhost","Port":5432}}"#).unwrap();

    sealcfg()
        .args(["encrypt", plain.to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .success();

    sealcfg()
        .args(["show", tmp.path().join("settings.json.enc").to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Db:Host = localhost"))
        .stdout(predicate::str::contains("Db:Port = 5432"));
}

#[test]
fn certs_lists_usable_keys() {
    let tmp = TempDir::new().unwrap();
    let store_root = tmp.path().join("store");
    seed_store(&store_root);

    sealcfg()
        .args(["certs"])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(THUMB));
}

#[test]
fn certs_on_empty_store() {
    let tmp = TempDir::new().unwrap();

    sealcfg()
        .args(["certs"])
        .args(["--store-root", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("none with a usable private key"));
}

#[test]
fn encrypting_empty_file_fails() {
    let tmp = TempDir::new().unwrap();
    let store_root = tmp.path().join("store");
    seed_store(&store_root);

    let plain = tmp.path().join("empty.json");
    std::fs::write(&plain, "").unwrap();

    sealcfg()
        .args(["encrypt", plain.to_str().unwrap()])
        .args(["--thumbprint", THUMB])
        .args(["--store-root", store_root.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input error"));
}
