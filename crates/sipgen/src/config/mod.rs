//! Run configuration read from `sipgen.toml`.
//!
//! Settings are split into one file per table. Each table deserializes into
//! a patch of optional fields that is laid over the defaults, so a config
//! file only needs the keys it changes. The CLI applies its own overrides on
//! top of the loaded [`Settings`].

pub(crate) mod input;
pub(crate) mod logging;
pub(crate) mod macros;
pub(crate) mod output;
pub(crate) mod preprocessor;

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

pub use input::InputSettings;
use input::InputSettingsPatch;
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
pub use macros::MacroSettings;
use macros::MacroSettingsPatch;
pub use output::OutputSettings;
use output::OutputSettingsPatch;
pub use preprocessor::{DEFAULT_QT_VERSION, PreprocessorSettings};
use preprocessor::PreprocessorSettingsPatch;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "sipgen.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub input: InputSettings,
    pub output: OutputSettings,
    pub preprocessor: PreprocessorSettings,
    pub macros: MacroSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load `path`, or the nearest `sipgen.toml` above the working directory.
    /// No config file at all yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir().ok().and_then(|cwd| find_config_file(&cwd)),
        };
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|error| error.in_file(path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let patch: SettingsPatch = toml::from_str(content).map_err(|error| ConfigError::Parse {
            path: None,
            message: error.to_string(),
        })?;
        let mut settings = Self::default();
        settings.apply_patch(patch)?;
        settings.normalize();
        Ok(settings)
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) -> Result<(), ConfigError> {
        if let Some(p) = patch.input {
            self.input.apply_patch(p);
        }
        if let Some(p) = patch.output {
            self.output.apply_patch(p);
        }
        if let Some(p) = patch.preprocessor {
            self.preprocessor.apply_patch(p).map_err(|message| ConfigError::InvalidValue {
                path: None,
                key: "preprocessor.qt-version",
                message,
            })?;
        }
        if let Some(p) = patch.macros {
            self.macros.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
        Ok(())
    }

    pub fn normalize(&mut self) {
        self.input.normalize();
        self.output.normalize();
        self.preprocessor.normalize();
        self.macros.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
struct SettingsPatch {
    input: Option<InputSettingsPatch>,
    output: Option<OutputSettingsPatch>,
    preprocessor: Option<PreprocessorSettingsPatch>,
    macros: Option<MacroSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, toml::Value>,
}

/// Walks up from `start` looking for a `sipgen.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
    InvalidValue {
        path: Option<PathBuf>,
        key: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn in_file(
        self,
        file: &Path,
    ) -> Self {
        match self {
            Self::Parse {
                message, ..
            } => Self::Parse {
                path: Some(file.to_path_buf()),
                message,
            },
            Self::InvalidValue {
                key,
                message,
                ..
            } => Self::InvalidValue {
                path: Some(file.to_path_buf()),
                key,
                message,
            },
            other => other,
        }
    }
}

impl Display for ConfigError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Io {
                path,
                source,
            } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse {
                path: Some(path),
                message,
            } => write!(f, "{}: {message}", path.display()),
            Self::Parse {
                path: None,
                message,
            } => write!(f, "invalid configuration: {message}"),
            Self::InvalidValue {
                path: Some(path),
                key,
                message,
            } => write!(f, "{}: {key}: {message}", path.display()),
            Self::InvalidValue {
                path: None,
                key,
                message,
            } => write!(f, "{key}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/config/config_tests.rs"]
mod tests;
