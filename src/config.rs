use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Monitored endpoints
// =============================================================================

/// Page that advertises the latest release
pub const PAGE_URL: &str = "https://www.pgsharp.com/";

/// LINE Messaging API push endpoint
pub const PUSH_API_URL: &str = "https://api.line.me/v2/bot/message/push";

/// User agent sent with the page request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 PGSharpMonitor/1.0";

/// Timeout for each HTTP request (15 seconds)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// =============================================================================
// Files
// =============================================================================

pub const VERSION_FILE_NAME: &str = "pgsharp_version.txt";
pub const LOG_FILE_NAME: &str = "pgsharp_monitor.log";

/// Size at which the log file is rotated (1 MiB)
pub const LOG_MAX_BYTES: u64 = 1024 * 1024;

/// Number of rotated log files kept next to the active one
pub const LOG_BACKUP_COUNT: usize = 3;

// =============================================================================
// Environment
// =============================================================================

pub const ENV_ACCESS_TOKEN: &str = "CHANNEL_ACCESS_TOKEN";
pub const ENV_TARGET_USER_ID: &str = "TARGET_USER_ID";
pub const ENV_BASE_DIR: &str = "SCRIPT_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Failed to load env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Failed to load .env file: {0}")]
    DefaultEnvFile(#[source] dotenvy::Error),
}

/// Settings for a single monitor run, resolved once at startup
#[derive(Clone, PartialEq)]
pub struct MonitorConfig {
    pub channel_access_token: String,
    pub target_user_id: String,
    /// Directory holding the version file and the log file
    pub base_dir: PathBuf,
    pub page_url: String,
    pub push_api_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl MonitorConfig {
    /// Builds the configuration from the process environment.
    /// `base_dir` takes precedence over `SCRIPT_BASE_DIR`.
    pub fn from_env(base_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), base_dir, dirs::home_dir())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        base_dir: Option<PathBuf>,
        home_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let channel_access_token = required(ENV_ACCESS_TOKEN)?;
        let target_user_id = required(ENV_TARGET_USER_ID)?;

        let base_dir = base_dir
            .or_else(|| {
                lookup(ENV_BASE_DIR)
                    .filter(|dir| !dir.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| data_dir_with_env(lookup("XDG_DATA_HOME"), home_dir));

        Ok(Self {
            channel_access_token,
            target_user_id,
            base_dir,
            page_url: PAGE_URL.to_string(),
            push_api_url: PUSH_API_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    /// Returns the path to the persisted version file.
    pub fn version_file(&self) -> PathBuf {
        self.base_dir.join(VERSION_FILE_NAME)
    }

    /// Returns the path to the log file.
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join(LOG_FILE_NAME)
    }
}

impl fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("channel_access_token", &"<redacted>")
            .field("target_user_id", &self.target_user_id)
            .field("base_dir", &self.base_dir)
            .field("page_url", &self.page_url)
            .field("push_api_url", &self.push_api_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

pub const ENV_FILE_NAME: &str = ".env";

/// Loads variables from an env file without overriding ones already set.
///
/// With an explicit `path` the file must exist. Otherwise `.env` next to the
/// executable is used when present, and failing that `.env` is searched from
/// the current directory upwards and silently skipped when absent.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    let beside_exe = || {
        env_file_beside_exe(std::env::current_exe().ok().as_deref(), |p| p.is_file())
    };

    match path.map(Path::to_path_buf).or_else(beside_exe) {
        Some(path) => dotenvy::from_path(&path)
            .map(|()| Some(path.clone()))
            .map_err(|source| ConfigError::EnvFile { path, source }),
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(ConfigError::DefaultEnvFile(e)),
        },
    }
}

/// `.env` in the executable's directory, if `exists` reports it present.
/// Scheduled runs usually start in an unrelated working directory.
fn env_file_beside_exe(exe: Option<&Path>, exists: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    exe.and_then(Path::parent)
        .map(|dir| dir.join(ENV_FILE_NAME))
        .filter(|candidate| exists(candidate))
}

/// Default base directory.
/// Uses $XDG_DATA_HOME/pgsharp-monitor if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/pgsharp-monitor,
/// or ./pgsharp-monitor if neither is available.
fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("pgsharp-monitor")
}
