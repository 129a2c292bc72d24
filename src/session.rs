//! Active-account session management.
//!
//! Account resolution order:
//! 1) CLI --account (explicit)
//! 2) TD_ACCOUNT environment variable
//! 3) Persisted session file (written by login/signup)
//!
//! A resolved name must exist in the credential registry; task commands
//! without any resolvable account fail with `NotLoggedIn`.

use crate::account::AccountStore;
use crate::error::{Error, Result};
use crate::lock;
use crate::storage::Storage;

/// Resolve the active account for account-scoped commands
pub fn resolve_account(storage: &Storage, cli_account: Option<&str>) -> Result<String> {
    let name = match pick_account(storage, cli_account)? {
        Some(name) => name,
        None => return Err(Error::NotLoggedIn),
    };

    let accounts = AccountStore::new(storage.clone());
    if !accounts.exists(&name)? {
        return Err(Error::AccountNotFound(name));
    }

    Ok(name)
}

fn pick_account(storage: &Storage, cli_account: Option<&str>) -> Result<Option<String>> {
    if let Some(account) = non_empty(cli_account) {
        return Ok(Some(account.to_string()));
    }

    if let Ok(env_account) = std::env::var("TD_ACCOUNT") {
        if let Some(account) = non_empty(Some(env_account.as_str())) {
            return Ok(Some(account.to_string()));
        }
    }

    load_session(storage)
}

/// Persist the active account in the session file
pub fn persist_session(storage: &Storage, username: &str) -> Result<()> {
    let username = non_empty(Some(username))
        .ok_or_else(|| Error::InvalidArgument("username cannot be empty".to_string()))?;
    lock::write_atomic_str(storage.session_file(), &format!("{username}\n"))
}

/// Load the persisted session, if any
pub fn load_session(storage: &Storage) -> Result<Option<String>> {
    let path = storage.session_file();
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    let username = raw.trim();
    if username.is_empty() {
        return Ok(None);
    }

    Ok(Some(username.to_string()))
}

/// Clear the persisted session
pub fn clear_session(storage: &Storage) -> Result<()> {
    let path = storage.session_file();
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
