//! User settings (`~/.config/lrsweep/settings.toml`).
//!
//! ```toml
//! [catalogue]
//! path = "/Users/me/Pictures/Lightroom/Lightroom Catalog.lrcat"
//!
//! [archive]
//! dir_name = "out-of-catalog"
//!
//! [selection]
//! active_slot = 1
//! selected_slot = 2
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use lrsweep_db::SelectionSlots;
use serde::Deserialize;

use crate::error::LibraryError;
use crate::maintenance::DEFAULT_ARCHIVE_DIR;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalogue: CatalogueSettings,
    pub archive: ArchiveSettings,
    pub selection: SelectionSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogueSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub dir_name: String,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            dir_name: DEFAULT_ARCHIVE_DIR.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub active_slot: i64,
    pub selected_slot: i64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        let slots = SelectionSlots::default();
        Self {
            active_slot: slots.active,
            selected_slot: slots.selected,
        }
    }
}

impl SelectionSettings {
    pub fn slots(&self) -> SelectionSlots {
        SelectionSlots {
            active: self.active_slot,
            selected: self.selected_slot,
        }
    }
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("lrsweep").join("settings.toml")
}

/// Load settings from the canonical path. A missing file yields defaults.
pub fn load_settings() -> Result<Settings, LibraryError> {
    load_settings_from(&settings_path())
}

/// Load settings from `path`. A missing file yields defaults; a malformed one is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings, LibraryError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&contents)
        .map_err(|e| LibraryError::settings(format!("{}: {}", path.display(), e)))
}

/// Load the settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

/// Resolve the catalogue path: CLI override first, then the settings file.
///
/// No fallback exists; a catalogue has to be named somewhere.
pub fn resolve_catalogue_path(
    cli_override: Option<PathBuf>,
    settings: &Settings,
) -> Result<PathBuf, LibraryError> {
    cli_override
        .or_else(|| settings.catalogue.path.clone())
        .ok_or_else(|| {
            LibraryError::settings(format!(
                "no catalogue given; pass -c <file.lrcat> or set catalogue.path in {}",
                settings_path().display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.catalogue.path.is_none());
        assert_eq!(settings.archive.dir_name, DEFAULT_ARCHIVE_DIR);
        assert_eq!(settings.selection.slots(), SelectionSlots::default());
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let settings: Settings = toml::from_str(
            "[catalogue]\npath = \"/pics/main.lrcat\"\n\n[selection]\nactive_slot = 40\n",
        )
        .unwrap();
        assert_eq!(
            settings.catalogue.path.as_deref(),
            Some(Path::new("/pics/main.lrcat"))
        );
        assert_eq!(settings.selection.active_slot, 40);
        assert_eq!(
            settings.selection.selected_slot,
            SelectionSlots::default().selected
        );
    }

    #[test]
    fn cli_override_wins() {
        let settings: Settings = toml::from_str("[catalogue]\npath = \"/from/settings.lrcat\"\n")
            .unwrap();
        let resolved =
            resolve_catalogue_path(Some(PathBuf::from("/from/cli.lrcat")), &settings).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/cli.lrcat"));

        let resolved = resolve_catalogue_path(None, &settings).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/settings.lrcat"));
    }

    #[test]
    fn nothing_configured_is_an_error() {
        let result = resolve_catalogue_path(None, &Settings::default());
        assert!(matches!(result, Err(LibraryError::Settings(_))));
    }
}
