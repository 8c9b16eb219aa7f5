//! Encrypted Record Store — append-only log of completed candidate profiles.
//!
//! Each line is `base64(nonce || AES-256-GCM(json(record)))`. The key is generated
//! once into the key file and reused for the lifetime of the store.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::candidate::CandidateRecord;

const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Encryption failed")]
    Crypto,

    #[error("Invalid key file {path}: {reason}")]
    InvalidKey { path: PathBuf, reason: String },
}

/// Result of reading the whole store.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<CandidateRecord>,
    /// Entries that failed to decode, decrypt or parse.
    pub skipped: usize,
}

pub struct RecordStore {
    path: PathBuf,
    cipher: Aes256Gcm,
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Opens the store at `path`, loading the key from `key_path` or generating
    /// and persisting a new one when the key file does not exist.
    pub fn open(path: impl Into<PathBuf>, key_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let cipher = load_or_create_key(key_path.as_ref())?;
        Ok(Self {
            path: path.into(),
            cipher,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encrypts the record and appends it as a single newline-terminated line.
    pub fn save(&self, record: &CandidateRecord) -> Result<(), StoreError> {
        let json = serde_json::to_vec(record)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, json.as_slice())
            .map_err(|_| StoreError::Crypto)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        let mut line = BASE64.encode(blob);
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        info!("Persisted candidate record to {}", self.path.display());
        Ok(())
    }

    /// Reads every entry. Undecodable entries are skipped, counted and logged.
    pub fn load_report(&self) -> Result<LoadReport, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadReport::default()),
            Err(e) => return Err(e.into()),
        };

        let mut report = LoadReport::default();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match self.decode_line(line) {
                Some(record) => report.records.push(record),
                None => {
                    warn!(
                        "Skipping unreadable entry at line {} of {}",
                        idx + 1,
                        self.path.display()
                    );
                    report.skipped += 1;
                }
            }
        }
        Ok(report)
    }

    pub fn load_all(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        Ok(self.load_report()?.records)
    }

    fn decode_line(&self, line: &str) -> Option<CandidateRecord> {
        let blob = BASE64.decode(line).ok()?;
        if blob.len() <= NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .ok()?;
        serde_json::from_slice(&plaintext).ok()
    }
}

fn load_or_create_key(path: &Path) -> Result<Aes256Gcm, StoreError> {
    if path.exists() {
        let encoded = fs::read_to_string(path)?;
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| StoreError::InvalidKey {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        return Aes256Gcm::new_from_slice(&bytes).map_err(|_| StoreError::InvalidKey {
            path: path.to_path_buf(),
            reason: format!("expected a 32-byte key, found {} bytes", bytes.len()),
        });
    }

    let key = Aes256Gcm::generate_key(OsRng);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, BASE64.encode(key.as_slice()))?;
    restrict_permissions(path)?;
    info!("Generated new store key at {}", path.display());

    Ok(Aes256Gcm::new(&key))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::complete_record;
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> RecordStore {
        RecordStore::open(dir.path().join("candidates.enc"), dir.path().join("secret.key"))
            .unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        let record = complete_record();
        store.save(&record).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![record]);
    }

    #[test]
    fn test_entries_are_not_plaintext() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.save(&complete_record()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("alice@example.com"));
        assert_eq!(raw.lines().count(), 1);
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn test_each_save_appends_one_line() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.save(&complete_record()).unwrap();
        store.save(&complete_record()).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupted_entry_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.save(&complete_record()).unwrap();

        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "this-is-not-a-valid-entry").unwrap();

        let report = store.load_report().unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0], complete_record());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_tampered_ciphertext_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.save(&complete_record()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let mut blob = BASE64.decode(raw.trim()).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        fs::write(store.path(), format!("{}\n", BASE64.encode(blob))).unwrap();

        let report = store.load_report().unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_key_is_reused_across_opens() {
        let dir = TempDir::new().unwrap();
        open_in(&dir).save(&complete_record()).unwrap();

        let reopened = open_in(&dir);
        assert_eq!(reopened.load_all().unwrap(), vec![complete_record()]);
    }

    #[test]
    fn test_entries_from_another_key_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.save(&complete_record()).unwrap();

        let other = RecordStore::open(store.path(), dir.path().join("other.key")).unwrap();
        let report = other.load_report().unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_malformed_key_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("secret.key");
        fs::write(&key_path, BASE64.encode([7u8; 8])).unwrap();

        let result = RecordStore::open(dir.path().join("candidates.enc"), &key_path);
        assert!(matches!(result, Err(StoreError::InvalidKey { .. })));
    }
}
