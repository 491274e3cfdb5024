use lrsweep_lib::settings;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// Show the settings file location and its effective values.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "lrsweep Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let current = settings::load_settings()?;
    let catalogue = current
        .catalogue
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string());
    log::info!("  catalogue.path         = {}", catalogue);
    log::info!("  archive.dir_name       = {}", current.archive.dir_name);
    log::info!("  selection.active_slot  = {}", current.selection.active_slot);
    log::info!("  selection.selected_slot = {}", current.selection.selected_slot);

    if let Some(raw) = settings::load_settings_string() {
        crate::log_blank();
        log::info!("{}", "Raw file:".if_supports_color(Stdout, |t| t.dimmed()));
        for line in raw.lines() {
            log::info!("  {}", line);
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings::settings_path().display());
    Ok(())
}
