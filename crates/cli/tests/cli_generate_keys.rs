//! CLI integration tests for `stakegen generate-keys` and `stakegen verify`.
//!
//! These tests verify that:
//! - generate-keys writes one keystore per validator plus deposit and stake files
//! - the written files pass `verify`
//! - invalid inputs exit with code 1 and an error on stderr

#![allow(deprecated)] // Command::cargo_bin is deprecated but still works

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const PASSWORD: &str = "correct horse battery";

/// Temp dir holding the mnemonic and password files, plus an output folder
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("mnemonic.txt"), format!("{}\n", MNEMONIC)).unwrap();
        fs::write(dir.path().join("password.txt"), format!("{}\n", PASSWORD)).unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn generate(&self, num_validators: u32, num_eth: u64, chain: &str) -> Command {
        let mut cmd = Command::cargo_bin("stakegen").expect("find stakegen binary");
        cmd.arg("generate-keys")
            .arg("--num-validators")
            .arg(num_validators.to_string())
            .arg("--num-eth")
            .arg(num_eth.to_string())
            .arg("--chain")
            .arg(chain)
            .arg("--folder")
            .arg(self.path("out"))
            .arg("--mnemonic-file")
            .arg(self.path("mnemonic.txt"))
            .arg("--keystore-password-file")
            .arg(self.path("password.txt"))
            .arg("--kdf-n")
            .arg("1024");
        cmd
    }
}

fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_cli_generate_keys_writes_and_verifies() {
    let fixture = Fixture::new();

    fixture
        .generate(2, 12, "prater")
        .assert()
        .success()
        .stdout(predicate::str::contains("Success!"))
        .stdout(predicate::str::contains("validator_keys"));

    let keys_dir = fixture.path("out").join("validator_keys");
    let keystores = files_with_prefix(&keys_dir, "keystore-m_12381_3600_");
    assert_eq!(keystores.len(), 2);

    let deposit_files = files_with_prefix(&keys_dir, "deposit_data-");
    let stake_files = files_with_prefix(&keys_dir, "stake_data-");
    assert_eq!(deposit_files.len(), 1);
    assert_eq!(stake_files.len(), 1);

    let deposits: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&deposit_files[0]).unwrap()).unwrap();
    let stakes: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&stake_files[0]).unwrap()).unwrap();
    assert_eq!(deposits.len(), 2);
    assert_eq!(deposits[0]["amount"], 12_000_000_000u64);
    assert_eq!(stakes[0]["amount"], 20_000_000_000u64);
    assert_eq!(deposits[0]["eth2_network_name"], "prater");
    assert_eq!(deposits[0]["fork_version"], "00001020");

    let keystore: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&keystores[0]).unwrap()).unwrap();
    assert_eq!(keystore["version"], 4);
    assert_eq!(keystore["path"], "m/12381/3600/0/0/0");
    assert_eq!(keystore["pubkey"], deposits[0]["pubkey"]);

    Command::cargo_bin("stakegen")
        .expect("find stakegen binary")
        .arg("verify")
        .arg("--deposit-file")
        .arg(&deposit_files[0])
        .arg("--stake-file")
        .arg(&stake_files[0])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deposit data OK"))
        .stdout(predicate::str::contains("Stake data OK"));
}

#[test]
fn test_cli_verify_rejects_tampered_file() {
    let fixture = Fixture::new();
    fixture.generate(1, 1, "mainnet").assert().success();

    let keys_dir = fixture.path("out").join("validator_keys");
    let deposit_file = &files_with_prefix(&keys_dir, "deposit_data-")[0];
    let mut records: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(deposit_file).unwrap()).unwrap();
    records[0]["amount"] = serde_json::json!(2_000_000_000u64);

    let tampered = fixture.path("tampered.json");
    fs::write(&tampered, serde_json::to_string(&records).unwrap()).unwrap();

    Command::cargo_bin("stakegen")
        .expect("find stakegen binary")
        .arg("verify")
        .arg("--deposit-file")
        .arg(&tampered)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to verify"));
}

#[test]
fn test_cli_generate_keys_rejects_unsupported_amount() {
    let fixture = Fixture::new();
    fixture
        .generate(1, 5, "mainnet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("num_eth only supports 1 or 12"));
}

#[test]
fn test_cli_generate_keys_rejects_unknown_chain() {
    let fixture = Fixture::new();
    fixture
        .generate(1, 12, "nosuchnet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown chain"));
}

#[test]
fn test_cli_generate_keys_rejects_weak_password() {
    let fixture = Fixture::new();
    fs::write(fixture.path("password.txt"), "short").unwrap();

    fixture
        .generate(1, 12, "mainnet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
    assert!(!fixture.path("out").join("validator_keys").exists());
}

#[test]
fn test_cli_generate_keys_rejects_bad_checksum() {
    let fixture = Fixture::new();
    fs::write(
        fixture.path("mnemonic.txt"),
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
    )
    .unwrap();

    fixture
        .generate(1, 12, "mainnet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid mnemonic"));
}

#[test]
fn test_cli_new_mnemonic() {
    Command::cargo_bin("stakegen")
        .expect("find stakegen binary")
        .arg("new-mnemonic")
        .arg("--words")
        .arg("12")
        .assert()
        .success()
        .stdout(predicate::str::contains("IMPORTANT"))
        .stdout(predicate::str::contains("12. "))
        .stdout(predicate::str::contains("13. ").not());
}
