use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use facecam_core::filtering::domain::filter_mode::{FilterMode, FilterSettings, PixelSize};
use facecam_core::shared::constants::DEFAULT_PIXEL_SIZE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Blur,
    Pixelate,
}

impl Mode {
    pub const ALL: &[Mode] = &[Mode::Blur, Mode::Pixelate];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", FilterMode::from(*self))
    }
}

impl From<Mode> for FilterMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Blur => FilterMode::Blur,
            Mode::Pixelate => FilterMode::Pixelate,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Dark,
    Light,
}

impl Appearance {
    pub fn toggled(self) -> Self {
        match self {
            Appearance::Dark => Appearance::Light,
            Appearance::Light => Appearance::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: Mode,
    pub pixel_size: u32,
    pub appearance: Appearance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Blur,
            pixel_size: DEFAULT_PIXEL_SIZE,
            appearance: Appearance::Dark,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceCam").join("settings.json"))
    }

    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable. Out-of-range pixel sizes are clamped.
    pub fn load_from(path: &Path) -> Self {
        let mut settings: Settings = fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        settings.pixel_size = PixelSize::new(settings.pixel_size).get();
        settings
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }

    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings::new(self.mode.into(), PixelSize::new(self.pixel_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");
        let settings = Settings {
            mode: Mode::Pixelate,
            pixel_size: 23,
            appearance: Appearance::Light,
        };
        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_in_defaults_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "mode": "pixelate", "pixel_size": 400 }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.mode, Mode::Pixelate);
        assert_eq!(settings.pixel_size, 50);
        assert_eq!(settings.appearance, Appearance::Dark);
    }

    #[test]
    fn test_filter_settings_mirror_selection() {
        let settings = Settings {
            mode: Mode::Pixelate,
            pixel_size: 12,
            ..Settings::default()
        };
        let filter = settings.filter_settings();
        assert_eq!(filter.mode, FilterMode::Pixelate);
        assert_eq!(filter.pixel_size.get(), 12);
    }

    #[test]
    fn test_appearance_toggles_both_ways() {
        assert_eq!(Appearance::Dark.toggled(), Appearance::Light);
        assert_eq!(Appearance::Light.toggled(), Appearance::Dark);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Blur.to_string(), "Blur");
        assert_eq!(Mode::Pixelate.to_string(), "Pixelate");
    }
}
