//! Account registry and credential gate.
//!
//! A flat username -> credential table in `accounts.json`. Login succeeds
//! only on an exact digest match; signup fails when the username is taken
//! and never alters the existing entry. Passwords are stored as salted
//! SHA-256 digests; there is no lockout, throttling, or expiry - this is
//! a local convenience gate, not real security.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::storage::Storage;

const ACCOUNTS_SCHEMA_VERSION: &str = "td.accounts.v1";

fn accounts_schema_version() -> String {
    ACCOUNTS_SCHEMA_VERSION.to_string()
}

/// One credential entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEntry {
    /// Unique key
    pub username: String,
    pub salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl AccountEntry {
    fn new(username: String, password: &str) -> Self {
        let salt = new_salt();
        let password_hash = password_digest(&salt, password);
        Self {
            username,
            salt,
            password_hash,
            created_at: Utc::now(),
        }
    }

    fn verify(&self, password: &str) -> bool {
        password_digest(&self.salt, password) == self.password_hash
    }
}

/// On-disk credential registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsRegistry {
    #[serde(default = "accounts_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
}

impl Default for AccountsRegistry {
    fn default() -> Self {
        Self {
            schema_version: accounts_schema_version(),
            accounts: Vec::new(),
        }
    }
}

impl AccountsRegistry {
    /// Find an entry by username
    pub fn find(&self, username: &str) -> Option<&AccountEntry> {
        self.accounts
            .iter()
            .find(|entry| entry.username == username)
    }

    /// Insert an entry, rejecting duplicate usernames
    fn insert(&mut self, entry: AccountEntry) -> Result<()> {
        if self.find(&entry.username).is_some() {
            return Err(Error::AccountExists(entry.username));
        }
        self.accounts.push(entry);
        Ok(())
    }
}

/// Durable account gate over the credential registry
#[derive(Debug, Clone)]
pub struct AccountStore {
    storage: Storage,
}

impl AccountStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Register a new account
    ///
    /// Fails with `AccountExists` when the username is taken; the stored
    /// credential for that username is left untouched.
    pub fn signup(&self, username: &str, password: &str) -> Result<AccountEntry> {
        let username = valid_username(username)?;
        valid_password(password)?;

        let entry = AccountEntry::new(username, password);
        let created = entry.clone();
        self.storage
            .update_json::<AccountsRegistry, _, _>(&self.storage.accounts_file(), move |registry| {
                registry.insert(entry)
            })?;

        Ok(created)
    }

    /// Authenticate against the stored credential
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub fn login(&self, username: &str, password: &str) -> Result<AccountEntry> {
        let username = valid_username(username)?;

        let registry = self.read_registry()?;
        let entry = registry
            .find(&username)
            .ok_or_else(|| Error::LoginFailed(username.clone()))?;

        if !entry.verify(password) {
            return Err(Error::LoginFailed(username));
        }

        Ok(entry.clone())
    }

    /// Whether a username is registered
    pub fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.read_registry()?.find(username.trim()).is_some())
    }

    fn read_registry(&self) -> Result<AccountsRegistry> {
        let path = self.storage.accounts_file();
        if !path.exists() {
            return Ok(AccountsRegistry::default());
        }
        self.storage.read_json(&path)
    }
}

fn valid_username(username: &str) -> Result<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("username cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

fn valid_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::InvalidArgument("password cannot be empty".to_string()));
    }
    Ok(())
}

fn new_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex(&bytes)
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex(&hasher.finalize())
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AccountStore) {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init().unwrap();
        let store = AccountStore::new(storage);
        (temp, store)
    }

    #[test]
    fn signup_then_login() {
        let (_temp, store) = store();

        let entry = store.signup("alice", "hunter2").unwrap();
        assert_eq!(entry.username, "alice");
        assert_ne!(entry.password_hash, "hunter2");

        let logged_in = store.login("alice", "hunter2").unwrap();
        assert_eq!(logged_in.username, "alice");
    }

    #[test]
    fn login_fails_on_wrong_password_and_unknown_user() {
        let (_temp, store) = store();
        store.signup("alice", "hunter2").unwrap();

        let err = store.login("alice", "wrong").unwrap_err();
        assert!(matches!(err, Error::LoginFailed(_)));

        let err = store.login("nobody", "hunter2").unwrap_err();
        assert!(matches!(err, Error::LoginFailed(_)));
    }

    #[test]
    fn duplicate_signup_fails_and_preserves_credential() {
        let (_temp, store) = store();

        let original = store.signup("alice", "hunter2").unwrap();

        let err = store.signup("alice", "other-password").unwrap_err();
        assert!(matches!(err, Error::AccountExists(_)));

        // The stored entry is byte-identical to the original
        let registry = store.read_registry().unwrap();
        assert_eq!(registry.accounts.len(), 1);
        assert_eq!(registry.find("alice"), Some(&original));

        // And the original password still works
        store.login("alice", "hunter2").unwrap();
        assert!(store.login("alice", "other-password").is_err());
    }

    #[test]
    fn usernames_are_trimmed_and_validated() {
        let (_temp, store) = store();

        store.signup("  alice  ", "pw").unwrap();
        assert!(store.exists("alice").unwrap());
        store.login("alice", "pw").unwrap();

        assert!(matches!(
            store.signup("   ", "pw").unwrap_err(),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(
            store.signup("bob", "").unwrap_err(),
            Error::InvalidArgument(_)
        ));
    }

    #[test]
    fn salts_differ_between_accounts() {
        let (_temp, store) = store();

        let alice = store.signup("alice", "same-password").unwrap();
        let bob = store.signup("bob", "same-password").unwrap();

        assert_ne!(alice.salt, bob.salt);
        assert_ne!(alice.password_hash, bob.password_hash);
    }
}
