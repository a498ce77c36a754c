use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;

pub const DEFAULT_HEADER_EXTENSION: &str = "h";
pub const DEFAULT_PRIVATE_SUFFIX: &str = "_p";

/// Which files in the input directory are treated as headers.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    pub directory: PathBuf,
    pub extension: String,
    /// Headers whose stem ends with this are private implementation headers.
    pub private_suffix: String,
    /// File names never processed.
    pub denylist: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            extension: DEFAULT_HEADER_EXTENSION.to_string(),
            private_suffix: DEFAULT_PRIVATE_SUFFIX.to_string(),
            denylist: vec!["ctkWidgets.h".to_string()],
        }
    }
}

impl InputSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: InputSettingsPatch,
    ) {
        if let Some(v) = patch.directory {
            self.directory = v;
        }
        if let Some(v) = patch.extension {
            self.extension = v;
        }
        if let Some(v) = patch.private_suffix {
            self.private_suffix = v;
        }
        if let Some(v) = patch.denylist {
            self.denylist = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        let extension = self.extension.trim().trim_start_matches('.');
        self.extension = if extension.is_empty() {
            DEFAULT_HEADER_EXTENSION.to_string()
        } else {
            extension.to_string()
        };
        self.denylist.retain(|name| !name.trim().is_empty());
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct InputSettingsPatch {
    pub(crate) directory: Option<PathBuf>,
    pub(crate) extension: Option<String>,
    pub(crate) private_suffix: Option<String>,
    pub(crate) denylist: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
