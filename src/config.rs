use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

/// Which login strategy the application runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// UI-only login against the built-in demo accounts
    #[default]
    Legacy,
    /// Accounts declared in this config file, each with its own uid
    Accounts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub uid: String,
    /// Hex-encoded SHA-256 of the password
    pub password_sha256: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Page the share links point at; the token is appended as `?t=`
    #[serde(default = "default_share_base_url")]
    pub base_url: String,
    #[serde(default = "default_ttl_days")]
    pub default_ttl_days: i64,
    #[serde(default = "default_token_length")]
    pub token_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file name inside the data directory, or an absolute path
    #[serde(default = "default_log_file")]
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_toggle_sidebar")]
    pub toggle_sidebar: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_search")]
    pub search: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
    #[serde(default = "default_cycle_status")]
    pub cycle_status: String,
    #[serde(default = "default_toggle_active")]
    pub toggle_active: String,
    #[serde(default = "default_convert")]
    pub convert: String,
    #[serde(default = "default_share")]
    pub share: String,
    #[serde(default = "default_suggest")]
    pub suggest: String,
    #[serde(default = "default_filter_timeframe")]
    pub filter_timeframe: String,
    #[serde(default = "default_filter_type")]
    pub filter_type: String,
    #[serde(default = "default_filter_status")]
    pub filter_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            sidebar_width_percent: default_sidebar_width(),
            auth: AuthConfig::default(),
            share: ShareConfig::default(),
            logging: LoggingConfig::default(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_share_base_url(),
            default_ttl_days: default_ttl_days(),
            token_length: default_token_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            toggle_sidebar: default_toggle_sidebar(),
            delete: default_delete(),
            search: default_search(),
            select: default_select(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
            help: default_help(),
            refresh: default_refresh(),
            cycle_status: default_cycle_status(),
            toggle_active: default_toggle_active(),
            convert: default_convert(),
            share: default_share(),
            suggest: default_suggest(),
            filter_timeframe: default_filter_timeframe(),
            filter_type: default_filter_type(),
            filter_status: default_filter_status(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
        }
    }
}

impl Theme {
    fn preset(fg: &str, bg: &str, highlight_bg: &str, highlight_fg: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            highlight_fg: highlight_fg.to_string(),
            tab_bg: default_tab_bg(),
        }
    }

    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();
        themes.insert("default".to_string(), Theme::preset("white", "black", "blue", "white"));
        themes.insert("dark".to_string(), Theme::preset("white", "black", "cyan", "black"));
        themes.insert("light".to_string(), Theme::preset("black", "white", "blue", "white"));
        themes.insert("festive".to_string(), Theme::preset("white", "black", "red", ""));
        themes.insert("monochrome".to_string(), Theme::preset("white", "black", "white", "black"));
        themes
    }
}

// Default value functions
fn default_sidebar_width() -> u16 {
    40
}

fn default_database_path() -> String {
    // Fallback only; load_with_profile() pins the path to the active profile
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("gifts.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/gifts/gifts.db".to_string()
    }
}

fn default_share_base_url() -> String {
    "share.html".to_string()
}

fn default_ttl_days() -> i64 {
    30
}

fn default_token_length() -> usize {
    28
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "gifts.log".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_toggle_sidebar() -> String {
    "b".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_search() -> String {
    "/".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_refresh() -> String {
    "r".to_string()
}

fn default_cycle_status() -> String {
    "Space".to_string()
}

fn default_toggle_active() -> String {
    "a".to_string()
}

fn default_convert() -> String {
    "c".to_string()
}

fn default_share() -> String {
    "s".to_string()
}

fn default_suggest() -> String {
    "g".to_string()
}

fn default_filter_timeframe() -> String {
    "f".to_string()
}

fn default_filter_type() -> String {
    "t".to_string()
}

fn default_filter_status() -> String {
    "v".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

impl Config {
    /// Load configuration from the profile's config file, or create it with defaults
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path, profile)
    }

    /// Load configuration from an explicit path, creating it with defaults if missing.
    /// The database path is pinned to the profile unless the file sets one.
    pub fn load_from_path(config_path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let mut config: Config = toml::from_str(&contents)?;
            if !contents.contains("database_path") {
                config.database_path = Self::default_database_path_for_profile(profile);
            }
            config
        } else {
            let mut config = Config::default();
            config.database_path = Self::default_database_path_for_profile(profile);
            if let Err(e) = config.save_to_path(config_path) {
                eprintln!("ERROR: Failed to save config file: {}", e);
                eprintln!("Config path: {:?}", config_path);
                return Err(e);
            }
            config
        };

        config.validate()?;
        config.config_version = Some(CURRENT_CONFIG_VERSION);
        Ok(config)
    }

    /// Reject settings the services cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.share.token_length == 0 {
            return Err(ConfigError::InvalidSetting("share.token_length must be at least 1".to_string()));
        }
        if !self.themes.contains_key(&self.current_theme)
            && !Theme::get_preset_themes().contains_key(&self.current_theme)
        {
            return Err(ConfigError::ThemeNotFound(self.current_theme.clone()));
        }
        if self.auth.mode == AuthMode::Accounts && self.auth.accounts.is_empty() {
            return Err(ConfigError::InvalidSetting(
                "auth.mode = \"accounts\" requires at least one [[auth.accounts]] entry".to_string(),
            ));
        }
        Ok(())
    }

    fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("gifts.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/gifts-dev/gifts.db".to_string(),
                utils::Profile::Prod => "~/.local/share/gifts/gifts.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Directory holding the database; the session and log files live next to it
    pub fn get_data_dir(&self) -> PathBuf {
        self.get_database_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Path of the persisted login session
    pub fn get_session_path(&self) -> PathBuf {
        self.get_data_dir().join("session.toml")
    }

    /// Path of the log file
    pub fn get_log_path(&self) -> PathBuf {
        let file = utils::expand_path(&self.logging.file);
        if file.is_absolute() {
            file
        } else {
            self.get_data_dir().join(file)
        }
    }

    /// Get the currently active theme
    /// If highlight_fg is empty, it is derived from highlight_bg
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = self
            .themes
            .get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default();

        if theme.highlight_fg.is_empty() {
            let calculated_fg = get_contrast_text_color(parse_color(&theme.highlight_bg));
            theme.highlight_fg = format_color_for_display(&calculated_fg);
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Profile;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("current_theme = \"dark\"").unwrap();
        assert_eq!(config.share.default_ttl_days, 30);
        assert_eq!(config.share.token_length, 28);
        assert_eq!(config.share.base_url, "share.html");
        assert_eq!(config.auth.mode, AuthMode::Legacy);
        assert_eq!(config.key_bindings.convert, "c");
    }

    #[test]
    fn accounts_mode_is_parsed() {
        let config: Config = toml::from_str(
            r#"
            [auth]
            mode = "accounts"

            [[auth.accounts]]
            email = "anna@example.com"
            uid = "u-anna"
            password_sha256 = "00"
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.mode, AuthMode::Accounts);
        assert_eq!(config.auth.accounts[0].uid, "u-anna");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn accounts_mode_without_accounts_is_rejected() {
        let config: Config = toml::from_str("[auth]\nmode = \"accounts\"").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSetting(_))));
    }

    #[test]
    fn load_from_path_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_from_path(&path, Profile::Dev).unwrap();
        assert!(path.exists());
        assert!(created.database_path.ends_with("gifts.db"));

        fs::write(&path, "database_path = \"/tmp/other.db\"\n[share]\ndefault_ttl_days = 7\n").unwrap();
        let loaded = Config::load_from_path(&path, Profile::Dev).unwrap();
        assert_eq!(loaded.database_path, "/tmp/other.db");
        assert_eq!(loaded.share.default_ttl_days, 7);
        assert_eq!(loaded.get_session_path(), PathBuf::from("/tmp/session.toml"));
    }

    #[test]
    fn unknown_theme_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "current_theme = \"festive\"\n").unwrap();
        assert_eq!(Config::load_from_path(&path, Profile::Dev).unwrap().current_theme, "festive");

        fs::write(&path, "current_theme = \"neon\"\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path, Profile::Dev),
            Err(ConfigError::ThemeNotFound(_))
        ));
    }

    #[test]
    fn empty_highlight_fg_is_derived() {
        let config = Config { current_theme: "festive".to_string(), ..Config::default() };
        assert_eq!(config.get_active_theme().highlight_fg, "white");
    }
}
