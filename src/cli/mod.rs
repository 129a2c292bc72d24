//! Command-line interface for td
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod account;
mod init;
mod task;
mod theme;

/// td - Task Deck
///
/// An account-scoped local task tracker: create, edit, filter, and delete
/// tasks with status and priority attributes, behind a minimal
/// username/password gate.
#[derive(Parser, Debug)]
#[command(name = "td")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TD_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Account to operate on (defaults to the logged-in session)
    #[arg(long, global = true, env = "TD_ACCOUNT")]
    pub account: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the data directory
    Init,

    /// Create an account (implicitly logs in)
    Signup {
        /// Username for the new account
        username: String,

        /// Password for the new account
        #[arg(long)]
        password: String,
    },

    /// Log in as an existing account
    Login {
        /// Account username
        username: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Clear the active session
    Logout,

    /// Show the active account
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Display theme
    #[command(subcommand)]
    Theme(ThemeCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task (status starts as pending)
    New {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long)]
        description: String,

        /// Priority: low, medium, high (default from config)
        #[arg(long)]
        priority: Option<String>,
    },

    /// List tasks, optionally filtered
    List {
        /// Status filter: pending, in_progress, completed, all
        #[arg(long, default_value = "all")]
        status: String,

        /// Priority filter: low, medium, high, all
        #[arg(long, default_value = "all")]
        priority: String,

        /// Show at most this many tasks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one task
    Show {
        /// Task id
        id: String,
    },

    /// Edit title and/or description
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Change a task's status
    Status {
        /// Task id
        id: String,

        /// New status: pending, in_progress, completed
        status: String,
    },

    /// Change a task's priority
    Priority {
        /// Task id
        id: String,

        /// New priority: low, medium, high
        priority: String,
    },

    /// Delete a task (irreversible)
    Rm {
        /// Task id
        id: String,
    },

    /// Per-status counts over the full list
    Counts,

    /// Interactive task viewer
    Tui,
}

/// Theme subcommands
#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Show the active theme
    Show,

    /// Set the theme: light or dark
    Set {
        /// Theme name
        theme: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => init::run(init::InitOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Signup { username, password } => {
                account::run_signup(account::SignupOptions {
                    username,
                    password,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
            Commands::Login { username, password } => {
                account::run_login(account::LoginOptions {
                    username,
                    password,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
            Commands::Logout => account::run_logout(account::LogoutOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Whoami => account::run_whoami(account::WhoamiOptions {
                account: self.account,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    title,
                    description,
                    priority,
                } => task::run_new(task::NewOptions {
                    title,
                    description,
                    priority,
                    account: self.account,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::List {
                    status,
                    priority,
                    limit,
                } => task::run_list(task::ListOptions {
                    status,
                    priority,
                    limit,
                    account: self.account,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    account: self.account,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                } => task::run_edit(task::EditOptions {
                    id,
                    title,
                    description,
                    account: self.account,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Status { id, status } => task::run_status(task::StatusOptions {
                    id,
                    status,
                    account: self.account,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Priority { id, priority } => {
                    task::run_priority(task::PriorityOptions {
                        id,
                        priority,
                        account: self.account,
                        data_dir: self.data_dir,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                TaskCommands::Rm { id } => task::run_rm(task::RmOptions {
                    id,
                    account: self.account,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Counts => task::run_counts(task::CountsOptions {
                    account: self.account,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Tui => task::run_tui(task::TuiOptions {
                    account: self.account,
                    data_dir: self.data_dir,
                }),
            },
            Commands::Theme(cmd) => match cmd {
                ThemeCommands::Show => theme::run_show(theme::ShowOptions {
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ThemeCommands::Set { theme } => theme::run_set(theme::SetOptions {
                    theme,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
        }
    }
}
