//! td init command implementation
//!
//! Creates the data directory skeleton, a default config, and initial
//! display preferences.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::{Prefs, Storage};

pub struct InitOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct InitReport {
    data_dir: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    tasks_dir: bool,
    prefs: bool,
}

pub fn run(options: InitOptions) -> Result<()> {
    let storage = Storage::resolve(options.data_dir)?;

    let created_tasks_dir = !storage.tasks_dir().exists();
    storage.init()?;

    let config_path = storage.config_file();
    let created_config = !config_path.exists();
    let config = if created_config {
        let config = Config::default();
        config.save(&config_path)?;
        config
    } else {
        Config::load_from_dir(storage.data_dir())
    };

    let created_prefs = storage.read_prefs()?.is_none();
    if created_prefs {
        storage.write_prefs(&Prefs {
            theme: config.default_theme(),
        })?;
    }

    let report = InitReport {
        data_dir: storage.data_dir().to_path_buf(),
        created: InitCreated {
            config: created_config,
            tasks_dir: created_tasks_dir,
            prefs: created_prefs,
        },
    };

    let mut created_items = Vec::new();
    if created_config {
        created_items.push("config.toml");
    }
    if created_tasks_dir {
        created_items.push("tasks/");
    }
    if created_prefs {
        created_items.push("prefs.json");
    }

    let header = if created_items.is_empty() {
        "td init: nothing to do".to_string()
    } else {
        "td init: initialized data directory".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", storage.data_dir().display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("td signup <username> --password <password>");
    human.push_next_step("td task new <title> --description <text>");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "init",
        &report,
        Some(&human),
    )?;

    Ok(())
}
