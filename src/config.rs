// Configuration for the client
//
// Configuration is loaded in order of precedence:
// 1. Environment variables (highest priority)
// 2. Config file (~/.config/mutirao/config.toml)
// 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log file rotation cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default level filter when RUST_LOG is unset: trace, debug, info, warn, error
    pub level: String,

    /// Also write JSON logs to rotating files
    pub file_enabled: bool,

    /// Directory for log files
    pub file_dir: PathBuf,

    /// Log file name prefix
    pub file_prefix: String,

    /// Rotation cadence for log files
    pub file_rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_prefix: "mutirao".to_string(),
            file_rotation: LogRotation::Daily,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL the fragment resources are served from
    pub base_url: String,

    /// Hash to load at boot; empty means "no hash yet" (the shell is
    /// enhanced in place and the root hash is claimed without a load)
    pub initial_route: String,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            initial_route: "#/".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Config file structure (everything optional; missing keys keep defaults)
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    initial_route: Option<String>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogging {
    level: Option<String>,
    file_enabled: Option<bool>,
    file_dir: Option<PathBuf>,
    file_prefix: Option<String>,
    file_rotation: Option<LogRotation>,
}

impl Config {
    /// Path of the config file, when a platform config dir exists
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mutirao").join("config.toml"))
    }

    /// Load configuration: defaults, then the config file, then environment
    /// variables.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<FileConfig>(&text) {
                    Ok(file) => config.apply_file(file),
                    Err(err) => {
                        eprintln!("Warning: ignoring malformed config {}: {err}", path.display())
                    }
                },
                // Missing file is the normal first-run case
                Err(_) => {}
            }
        }

        config.apply_env();
        config
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(initial_route) = file.initial_route {
            self.initial_route = initial_route;
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(file_enabled) = logging.file_enabled {
                self.logging.file_enabled = file_enabled;
            }
            if let Some(file_dir) = logging.file_dir {
                self.logging.file_dir = file_dir;
            }
            if let Some(file_prefix) = logging.file_prefix {
                self.logging.file_prefix = file_prefix;
            }
            if let Some(file_rotation) = logging.file_rotation {
                self.logging.file_rotation = file_rotation;
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var("MUTIRAO_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(initial_route) = std::env::var("MUTIRAO_ROUTE") {
            self.initial_route = initial_route;
        }
        if let Ok(level) = std::env::var("MUTIRAO_LOG") {
            self.logging.level = level;
        }
        if let Ok(dir) = std::env::var("MUTIRAO_LOG_DIR") {
            self.logging.file_enabled = true;
            self.logging.file_dir = PathBuf::from(dir);
        }
    }

    /// Render the commented config template with this config's values
    pub fn to_toml(&self) -> String {
        let rotation = match self.logging.file_rotation {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        };
        format!(
            r#"# mutirao configuration
# Environment variables (MUTIRAO_BASE_URL, MUTIRAO_ROUTE, MUTIRAO_LOG,
# MUTIRAO_LOG_DIR) override anything set here.

# Base URL the page fragments are served from
base_url = {base_url:?}

# Hash to load at boot ("" enhances the shell in place without a load)
initial_route = {initial_route:?}

[logging]
# Default level filter when RUST_LOG is unset
level = {level:?}

# Also write JSON logs to rotating files
file_enabled = {file_enabled}
file_dir = {file_dir:?}
file_prefix = {file_prefix:?}
# "hourly", "daily" or "never"
file_rotation = {rotation:?}
"#,
            base_url = self.base_url,
            initial_route = self.initial_route,
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display().to_string(),
            file_prefix = self.logging.file_prefix,
        )
    }

    /// Write the config template on first run so users can discover the
    /// options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        if let Err(err) = std::fs::write(&path, Config::default().to_toml()) {
            eprintln!("Warning: could not write config template: {err}");
        }
    }
}
