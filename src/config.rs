//! Engine configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional `efimount.toml` in the per-user config directory, then an
//! explicitly supplied file, then `EFIMOUNT_*` environment variables
//! (nested keys use `__`, e.g. `EFIMOUNT_TOOLS__DISKUTIL`).

use crate::EngineResult;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "efimount.toml";
pub const ENV_PREFIX: &str = "EFIMOUNT";

/// How privileged commands obtain administrator rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationMethod {
    /// AppleScript `do shell script ... with administrator privileges`
    Osascript,
    /// `sudo -n`
    Sudo,
    /// polkit `pkexec`
    Pkexec,
    /// Privileged strategies are always refused
    None,
}

impl Default for ElevationMethod {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            ElevationMethod::Osascript
        } else {
            ElevationMethod::Sudo
        }
    }
}

/// Names (or absolute paths) of the utilities the engine drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub diskutil: String,
    pub mount: String,
    pub df: String,
    pub system_profiler: String,
    pub csrutil: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            diskutil: "diskutil".to_string(),
            mount: "mount".to_string(),
            df: "df".to_string(),
            system_profiler: "system_profiler".to_string(),
            csrutil: "csrutil".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory under which external volumes are mounted
    pub volumes_root: PathBuf,

    pub tools: ToolPaths,

    pub elevation: ElevationMethod,

    /// Consider partitions of the running boot disk as mount candidates
    pub include_boot_disk: bool,

    /// Bootloader configuration file searched for by the locator
    pub bootloader_config_name: String,

    /// Maximum directory depth below `volumes_root` for that search
    pub config_search_depth: usize,

    /// Parent directories between the configuration file and its volume root
    pub config_ascend_levels: usize,

    pub allow_forced_mount: bool,

    pub allow_read_only_mount: bool,

    /// Filesystem type handed to `mount -t` by the forced strategy
    pub forced_fs_type: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volumes_root: PathBuf::from("/Volumes"),
            tools: ToolPaths::default(),
            elevation: ElevationMethod::default(),
            include_boot_disk: false,
            bootloader_config_name: "config.plist".to_string(),
            config_search_depth: 4,
            config_ascend_levels: 3,
            allow_forced_mount: true,
            allow_read_only_mount: true,
            forced_fs_type: "msdos".to_string(),
        }
    }
}

impl EngineConfig {
    /// Per-user configuration file location, if the platform has one.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "efimount", "efimount")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads the layered configuration.
    ///
    /// A missing per-user file is fine; a missing `explicit` file is an error.
    pub fn load(explicit: Option<&Path>) -> EngineResult<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = Self::default_config_path() {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.volumes_root.as_os_str().is_empty() {
            return Err(crate::EngineError::Config(
                "volumes_root must not be empty".to_string(),
            ));
        }
        if self.bootloader_config_name.trim().is_empty() {
            return Err(crate::EngineError::Config(
                "bootloader_config_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style override used by tests and embedding callers.
    pub fn with_volumes_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.volumes_root = root.into();
        self
    }
}
