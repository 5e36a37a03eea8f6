use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "setzkasten";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// TTF override for body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_font: Option<PathBuf>,

    /// TTF override for headlines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline_font: Option<PathBuf>,

    /// Directory that bare export filenames resolve against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            body_font: None,
            headline_font: None,
            export_dir: None,
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

pub fn load_settings() {
    let Some(path) = config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(settings) => {
                if settings.version != CURRENT_VERSION {
                    warn!(
                        "Settings file {path:?} has version {}, expected {CURRENT_VERSION}; using defaults",
                        settings.version
                    );
                    return;
                }
                debug!("Loaded settings from {path:?}");
                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                warn!("Failed to parse settings file {path:?}: {e}, using defaults");
            }
        },
        Err(e) => {
            warn!("Failed to read settings file {path:?}: {e}, using defaults");
        }
    }
}

pub fn save_settings() {
    let Some(path) = config_path() else {
        warn!("Could not determine config directory, cannot save settings");
        return;
    };
    if let Ok(settings) = SETTINGS.read() {
        save_settings_to_file(&settings, &path);
    }
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = generate_settings_yaml(settings);

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push('\n');

    content.push_str(FONTS_TEMPLATE);
    match &settings.body_font {
        Some(path) => content.push_str(&format!("body_font: \"{}\"\n", path.display())),
        None => content.push_str("# body_font: \"/path/to/body.ttf\"\n"),
    }
    match &settings.headline_font {
        Some(path) => content.push_str(&format!("headline_font: \"{}\"\n", path.display())),
        None => content.push_str("# headline_font: \"/path/to/headline.ttf\"\n"),
    }
    content.push('\n');

    content.push_str(EXPORT_TEMPLATE);
    match &settings.export_dir {
        Some(path) => content.push_str(&format!("export_dir: \"{}\"\n", path.display())),
        None => content.push_str("# export_dir: \"~/Documents/setzkasten\"\n"),
    }

    content
}

const FONTS_TEMPLATE: &str = r#"# ============================================================================
# Fonts
# ============================================================================
# Optional TTF overrides for the two text roles. When unset, a short list
# of common system font paths is probed. Layout always works from built-in
# width tables; these faces only affect rasterized glyph shapes.
#
"#;

const EXPORT_TEMPLATE: &str = r#"# ============================================================================
# Export
# ============================================================================
# Bare export filenames (no directory part) resolve against this directory.
#
"#;

// Public API for accessing settings

pub fn get_body_font() -> Option<PathBuf> {
    SETTINGS.read().map(|s| s.body_font.clone()).unwrap_or(None)
}

pub fn get_headline_font() -> Option<PathBuf> {
    SETTINGS
        .read()
        .map(|s| s.headline_font.clone())
        .unwrap_or(None)
}

pub fn get_export_dir() -> Option<PathBuf> {
    SETTINGS
        .read()
        .map(|s| s.export_dir.clone())
        .unwrap_or(None)
}
