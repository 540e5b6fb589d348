// Configuration functions

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, FileFormat};
use log::{debug, error, info};

use crate::errors::ClosingsError;

pub const NAMES_SECTION: &str = "SCHOOL_NAMES";
pub const NAMES_KEY: &str = "names";
pub const SETTINGS_SECTION: &str = "SETTINGS";
pub const RESERVED_NAME_CHARS: [char; 3] = [',', '"', '\\'];
pub const ENV_PREFIX: &str = "CLOSINGS";
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_FEED_URL: &str =
    "https://assets1.cbsnewsstatic.com/Integrations/SchoolClosings/PRODUCTION/CBS/kdka/NEWSROOM/KDKAclosings.xml";

/// Reads a string setting, falling back to the default when it is absent.
macro_rules! get_cfg {
    ($config_key:expr, $config_obj:expr, $default_value:expr) => {
        match lookup_setting($config_obj, $config_key) {
            Some(param_val_str) => param_val_str,
            None => {
                log::debug!("Parameter {} not configured, using default {}", $config_key, $default_value);
                $default_value.to_string()
            }
        }
    };
}

/// Reads an integer setting; malformed values are logged and replaced by the default.
macro_rules! get_cfg_int {
    ($config_key:expr, $config_obj:expr, $default_value:expr) => {
        match lookup_setting($config_obj, $config_key) {
            Some(param_val_str) => match param_val_str.trim().parse::<u64>() {
                Result::Ok(configintvalue) => configintvalue,
                Err(e) => {
                    log::error!(
                        "Could not convert parameter {} to integer, using default {}, error: {}",
                        $config_key,
                        $default_value,
                        e
                    );
                    $default_value
                }
            },
            None => $default_value,
        }
    };
}

/// Application settings, resolved from the environment, then the `[SETTINGS]` section of the
/// config file, then the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub feed_url: String,
    pub fetch_timeout: u64,
    pub connect_timeout: u64,
    pub user_agent: String,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            feed_url: DEFAULT_FEED_URL.to_string(),
            fetch_timeout: 20,
            connect_timeout: 10,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            log_level: "WARN".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Loads the settings for the given config file. The file itself is optional here.
    pub fn load(cfg_file: &Path) -> Result<Settings, ClosingsError> {
        let app_config = Config::builder()
            .add_source(config::File::new(&cfg_file.to_string_lossy(), FileFormat::Ini).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(Settings::from_config(&app_config))
    }

    pub fn from_config(app_config: &Config) -> Settings {
        let defaults = Settings::default();
        Settings {
            feed_url: get_cfg!("feed_url", app_config, defaults.feed_url),
            fetch_timeout: get_cfg_int!("fetch_timeout", app_config, defaults.fetch_timeout),
            connect_timeout: get_cfg_int!("connect_timeout", app_config, defaults.connect_timeout),
            user_agent: get_cfg!("user_agent", app_config, defaults.user_agent),
            log_level: get_cfg!("log_level", app_config, defaults.log_level),
            log_file: lookup_setting(app_config, "log_file").filter(|name| !name.trim().is_empty()),
        }
    }
}

/// Environment variables arrive as top level keys, the ini section as a nested table.
fn lookup_setting(app_config: &Config, key: &str) -> Option<String> {
    let candidates = [
        key.to_string(),
        format!("{}.{}", SETTINGS_SECTION, key),
        format!("{}.{}", SETTINGS_SECTION.to_lowercase(), key),
    ];
    candidates
        .iter()
        .find_map(|candidate| app_config.get_string(candidate).ok())
}

/// The tracked school names, kept under `[SCHOOL_NAMES] names = ...` in an ini file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> ConfigStore {
        ConfigStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with an empty name list when it does not exist yet.
    /// Returns true when the file was created.
    pub fn ensure_exists(&self) -> Result<bool, ClosingsError> {
        if self.path.exists() {
            return Ok(false);
        }
        let contents = format!("[{}]\n{} = \n\n", NAMES_SECTION, NAMES_KEY);
        fs::write(&self.path, contents).map_err(|source| self.io_error(source))?;
        info!("Initialised config file: {:?}", self.path);
        Ok(true)
    }

    /// Reads the tracked names: split on commas, trimmed, lower-cased, blanks dropped.
    pub fn read_names(&self) -> Result<Vec<String>, ClosingsError> {
        let app_config = Config::builder()
            .add_source(config::File::new(&self.path.to_string_lossy(), FileFormat::Ini))
            .build()?;

        let value = [
            format!("{}.{}", NAMES_SECTION, NAMES_KEY),
            format!("{}.{}", NAMES_SECTION.to_lowercase(), NAMES_KEY),
        ]
        .iter()
        .find_map(|key| app_config.get_string(key).ok())
        .ok_or_else(|| {
            ClosingsError::Config(format!(
                "{:?} has no '{}' key in section [{}]",
                self.path, NAMES_KEY, NAMES_SECTION
            ))
        })?;

        Ok(parse_names(&value))
    }

    /// Replaces the `names` value, leaving every other line of the file as it was.
    /// The new contents are written to a sibling file and renamed over the original.
    pub fn write_names(&self, names: &[String]) -> Result<(), ClosingsError> {
        let original = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let updated = replace_names_value(&original, &names.join(", ")).ok_or_else(|| {
            ClosingsError::Config(format!("{:?} has no section [{}]", self.path, NAMES_SECTION))
        })?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, updated).map_err(|source| self.io_error(source))?;
        if let Err(source) = fs::rename(&tmp_path, &self.path) {
            if let Err(e) = fs::remove_file(&tmp_path) {
                error!("Could not remove temporary config file {:?}: {}", tmp_path, e);
            }
            return Err(self.io_error(source));
        }
        debug!("Wrote {} names to config file {:?}", names.len(), self.path);
        Ok(())
    }

    /// Appends a name (lower-cased) to the list. Duplicates are allowed.
    /// Commas split the list, and the ini reader strips quotes and unescapes backslashes,
    /// so names holding any of those are refused.
    pub fn add_name(&self, school_name: &str) -> Result<(), ClosingsError> {
        let new_name = school_name.trim().to_lowercase();
        if new_name.is_empty() || new_name.contains(RESERVED_NAME_CHARS) {
            return Err(ClosingsError::InvalidName(school_name.to_string()));
        }
        let mut school_names = self.read_names()?;
        school_names.push(new_name);
        self.write_names(&school_names)
    }

    /// Removes every entry equal to the lower-cased name. Returns how many were removed.
    pub fn remove_name(&self, school_name: &str) -> Result<usize, ClosingsError> {
        let target = school_name.trim().to_lowercase();
        let school_names = self.read_names()?;
        let before = school_names.len();
        let kept: Vec<String> = school_names.into_iter().filter(|name| *name != target).collect();
        let removed = before - kept.len();
        if removed == 0 {
            info!("School name '{}' was not in the config", target);
        }
        self.write_names(&kept)?;
        Ok(removed)
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn io_error(&self, source: std::io::Error) -> ClosingsError {
        ClosingsError::ConfigIo {
            path: self.path.clone(),
            source,
        }
    }
}

pub fn parse_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Rewrites the `names` line of the names section, dropping any indented continuation
/// lines of the old value. Adds the key if the section lacks it. Returns None when the
/// section is missing.
fn replace_names_value(original: &str, joined: &str) -> Option<String> {
    let new_line = format!("{} = {}", NAMES_KEY, joined);
    let mut output: Vec<String> = Vec::new();
    let mut in_section = false;
    let mut section_seen = false;
    let mut key_written = false;
    let mut skipping_continuation = false;

    for line in original.lines() {
        let trimmed = line.trim();

        if skipping_continuation {
            if !trimmed.is_empty() && line.starts_with(char::is_whitespace) {
                continue;
            }
            skipping_continuation = false;
        }

        if let Some(section) = section_name(trimmed) {
            if in_section && !key_written {
                insert_before_blank_tail(&mut output, new_line.clone());
                key_written = true;
            }
            in_section = section == NAMES_SECTION;
            section_seen |= in_section;
            output.push(line.to_string());
            continue;
        }

        if in_section && !key_written && is_names_key(trimmed) {
            output.push(new_line.clone());
            key_written = true;
            skipping_continuation = true;
            continue;
        }
        output.push(line.to_string());
    }

    if !section_seen {
        return None;
    }
    if !key_written {
        insert_before_blank_tail(&mut output, new_line);
    }

    let mut updated = output.join("\n");
    updated.push('\n');
    Some(updated)
}

fn section_name(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn is_names_key(trimmed: &str) -> bool {
    if trimmed.starts_with('#') || trimmed.starts_with(';') {
        return false;
    }
    match trimmed.find(|c: char| c == '=' || c == ':') {
        Some(pos) => trimmed[..pos].trim().eq_ignore_ascii_case(NAMES_KEY),
        None => false,
    }
}

fn insert_before_blank_tail(output: &mut Vec<String>, line: String) {
    let mut pos = output.len();
    while pos > 0 && output[pos - 1].trim().is_empty() {
        pos -= 1;
    }
    output.insert(pos, line);
}
