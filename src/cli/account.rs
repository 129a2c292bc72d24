//! td signup/login/logout/whoami command implementations.

use std::path::PathBuf;

use crate::account::AccountStore;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session;
use crate::storage::Storage;

pub struct SignupOptions {
    pub username: String,
    pub password: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct LoginOptions {
    pub username: String,
    pub password: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct LogoutOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct WhoamiOptions {
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

fn load_storage(data_dir: Option<PathBuf>) -> Result<Storage> {
    let storage = Storage::resolve(data_dir)?;
    storage.require_initialized()?;
    Ok(storage)
}

pub fn run_signup(options: SignupOptions) -> Result<()> {
    let storage = load_storage(options.data_dir)?;
    let accounts = AccountStore::new(storage.clone());

    let entry = accounts.signup(&options.username, &options.password)?;
    // Signup is an implicit login
    session::persist_session(&storage, &entry.username)?;

    let mut human = HumanOutput::new("Account created");
    human.push_summary("Username", entry.username.clone());
    human.push_summary("Logged in", "yes".to_string());
    human.push_next_step("td task new <title> --description <text>");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "signup",
        &SessionOutput {
            account: entry.username,
        },
        Some(&human),
    )
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let storage = load_storage(options.data_dir)?;
    let accounts = AccountStore::new(storage.clone());

    let entry = accounts.login(&options.username, &options.password)?;
    session::persist_session(&storage, &entry.username)?;

    let mut human = HumanOutput::new("Logged in");
    human.push_summary("Username", entry.username.clone());
    human.push_next_step("td task list");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "login",
        &SessionOutput {
            account: entry.username,
        },
        Some(&human),
    )
}

pub fn run_logout(options: LogoutOptions) -> Result<()> {
    let storage = load_storage(options.data_dir)?;

    let previous = session::load_session(&storage)?;
    session::clear_session(&storage)?;

    let mut human = HumanOutput::new("Logged out");
    match &previous {
        Some(account) => human.push_summary("Was", account.clone()),
        None => human.push_summary("Was", "nobody".to_string()),
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "logout",
        &LogoutOutput { previous },
        Some(&human),
    )
}

pub fn run_whoami(options: WhoamiOptions) -> Result<()> {
    let storage = load_storage(options.data_dir)?;

    let account = session::resolve_account(&storage, options.account.as_deref())?;

    let human = {
        let mut human = HumanOutput::new("Active account");
        human.push_summary("Username", account.clone());
        human
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "whoami",
        &SessionOutput { account },
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct SessionOutput {
    account: String,
}

#[derive(serde::Serialize)]
struct LogoutOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<String>,
}
