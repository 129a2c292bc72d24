//! td theme command implementations.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::{Prefs, Storage, Theme};

pub struct ShowOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct SetOptions {
    pub theme: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let storage = Storage::resolve(options.data_dir)?;
    storage.require_initialized()?;

    // prefs.json wins; the config value only seeds the first run
    let theme = match storage.read_prefs()? {
        Some(prefs) => prefs.theme,
        None => Config::load_from_dir(storage.data_dir()).default_theme(),
    };

    let mut human = HumanOutput::new("Theme");
    human.push_summary("Active", theme.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "theme show",
        &ThemeOutput { theme },
        Some(&human),
    )
}

pub fn run_set(options: SetOptions) -> Result<()> {
    let storage = Storage::resolve(options.data_dir)?;
    storage.require_initialized()?;

    let theme = options.theme.parse::<Theme>()?;
    storage.write_prefs(&Prefs { theme })?;

    let mut human = HumanOutput::new("Theme set");
    human.push_summary("Active", theme.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "theme set",
        &ThemeOutput { theme },
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct ThemeOutput {
    theme: Theme,
}
