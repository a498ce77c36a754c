use std::{collections::HashMap, path::PathBuf};

use chrono::Datelike;
use serde::Deserialize;

pub const DEFAULT_ARTIFACT_EXTENSION: &str = "sip";

/// Where artifacts go and what the header template is rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub extension: String,
    /// File holding the header template placed at the top of every artifact.
    pub header_template: Option<PathBuf>,
    pub lib_name: String,
    pub copy_year: String,
    pub copy_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            header_template: None,
            lib_name: String::new(),
            copy_year: chrono::Local::now().year().to_string(),
            copy_name: String::new(),
        }
    }
}

impl OutputSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: OutputSettingsPatch,
    ) {
        if let Some(v) = patch.directory {
            self.directory = v;
        }
        if let Some(v) = patch.extension {
            self.extension = v;
        }
        if let Some(v) = patch.header_template {
            self.header_template = Some(v);
        }
        if let Some(v) = patch.lib_name {
            self.lib_name = v;
        }
        if let Some(v) = patch.copy_year {
            self.copy_year = v;
        }
        if let Some(v) = patch.copy_name {
            self.copy_name = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        let extension = self.extension.trim().trim_start_matches('.');
        self.extension = if extension.is_empty() {
            DEFAULT_ARTIFACT_EXTENSION.to_string()
        } else {
            extension.to_string()
        };
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct OutputSettingsPatch {
    pub(crate) directory: Option<PathBuf>,
    pub(crate) extension: Option<String>,
    pub(crate) header_template: Option<PathBuf>,
    pub(crate) lib_name: Option<String>,
    pub(crate) copy_year: Option<String>,
    pub(crate) copy_name: Option<String>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
