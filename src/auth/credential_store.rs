// src/auth/credential_store.rs
//! File-backed username -> credential map.
//!
//! Every operation reads the whole file, applies its change and writes the
//! whole file back. A mutex serializes those cycles within the process, and
//! each write lands in a temporary file that is renamed over the original, so
//! a reader never observes a half-written map.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

const SALT_BYTES: usize = 16;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum StoredCredential {
    Hashed { salt: String, digest: String },
    /// Plain password as written by earlier versions of the user file.
    Legacy(String),
}

impl StoredCredential {
    fn hash(password: &str) -> Self {
        let salt: [u8; SALT_BYTES] = rand::thread_rng().gen();
        StoredCredential::Hashed {
            salt: hex::encode(salt),
            digest: digest_password(&salt, password),
        }
    }

    fn matches(&self, password: &str) -> bool {
        match self {
            StoredCredential::Hashed { salt, digest } => match hex::decode(salt) {
                Ok(salt) => digest_password(&salt, password) == *digest,
                Err(_) => false,
            },
            StoredCredential::Legacy(stored) => stored == password,
        }
    }

    fn is_legacy(&self) -> bool {
        matches!(self, StoredCredential::Legacy(_))
    }
}

fn digest_password(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

type UserMap = BTreeMap<String, StoredCredential>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created,
    AlreadyExists,
}

pub struct CredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CredentialStore {
    /// Opens the store, creating an empty user file if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };

        if !store.path.exists() {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context(format!(
                    "Failed to create directory for user file {}",
                    store.path.display()
                ))?;
            }
            store.write_users(&UserMap::new())?;
            info!("Created empty user file at {}", store.path.display());
        }

        let users = store.read_users()?;
        info!(
            "Credential store ready at {} ({} users)",
            store.path.display(),
            users.len()
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_users(&self) -> Result<UserMap> {
        let raw = fs::read_to_string(&self.path)
            .context(format!("Failed to read user file {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(UserMap::new());
        }
        serde_json::from_str(&raw)
            .context(format!("Failed to parse user file {}", self.path.display()))
    }

    fn write_users(&self, users: &UserMap) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .context("Failed to create temporary user file")?;
        serde_json::to_writer_pretty(&mut tmp, users).context("Failed to serialize users")?;
        tmp.flush().context("Failed to flush temporary user file")?;
        tmp.persist(&self.path)
            .map_err(|e| anyhow!("Failed to replace user file {}: {}", self.path.display(), e))?;
        Ok(())
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| anyhow!("Credential store lock poisoned"))
    }

    pub fn user_exists(&self, username: &str) -> Result<bool> {
        let _guard = self.locked()?;
        Ok(self.read_users()?.contains_key(username))
    }

    pub fn user_count(&self) -> Result<usize> {
        let _guard = self.locked()?;
        Ok(self.read_users()?.len())
    }

    /// Usernames are stored exactly as given; `" ana"` and `"ana"` are
    /// different accounts.
    pub fn register(&self, username: &str, password: &str) -> Result<RegistrationOutcome> {
        if username.is_empty() || password.is_empty() {
            bail!("Username and password must not be empty");
        }

        let _guard = self.locked()?;
        let mut users = self.read_users()?;
        if users.contains_key(username) {
            debug!("Registration refused, user '{}' already exists", username);
            return Ok(RegistrationOutcome::AlreadyExists);
        }

        users.insert(username.to_string(), StoredCredential::hash(password));
        self.write_users(&users)?;
        info!("Registered user '{}'", username);
        Ok(RegistrationOutcome::Created)
    }

    /// Checks a username/password pair. Legacy plain entries that match are
    /// rewritten as salted digests.
    pub fn validate(&self, username: &str, password: &str) -> Result<bool> {
        let _guard = self.locked()?;
        let mut users = self.read_users()?;

        let Some(credential) = users.get(username) else {
            return Ok(false);
        };
        if !credential.matches(password) {
            return Ok(false);
        }

        if credential.is_legacy() {
            users.insert(username.to_string(), StoredCredential::hash(password));
            if let Err(e) = self.write_users(&users) {
                warn!("Could not upgrade stored credential for '{}': {}", username, e);
            } else {
                info!("Upgraded legacy credential for '{}'", username);
            }
        }
        Ok(true)
    }
}
