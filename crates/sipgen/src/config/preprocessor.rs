use std::collections::HashMap;

use serde::Deserialize;

use crate::conditionals::{DEFAULT_VERSION_SYMBOL, parse_version_setting};

pub const DEFAULT_QT_VERSION: u32 = 0x05_04_00;

/// The fixed target configuration conditionals are resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessorSettings {
    /// Allow-list of symbols treated as defined. Every other symbol is undefined.
    pub defines: Vec<String>,
    /// Target version encoded as `(major << 16) | (minor << 8) | patch`.
    pub qt_version: u32,
    pub version_symbol: String,
}

impl Default for PreprocessorSettings {
    fn default() -> Self {
        Self {
            defines: vec!["USE_QFILEDIALOG_OPTIONS".to_string()],
            qt_version: DEFAULT_QT_VERSION,
            version_symbol: DEFAULT_VERSION_SYMBOL.to_string(),
        }
    }
}

impl PreprocessorSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: PreprocessorSettingsPatch,
    ) -> Result<(), String> {
        if let Some(v) = patch.defines {
            self.defines = v;
        }
        if let Some(v) = patch.qt_version {
            self.qt_version = match v {
                VersionValue::Number(n) => u32::try_from(n).map_err(|_| format!("qt-version {n} is out of range"))?,
                VersionValue::Text(text) => {
                    parse_version_setting(&text).ok_or_else(|| format!("qt-version `{text}` is not a version"))?
                },
            };
        }
        if let Some(v) = patch.version_symbol {
            self.version_symbol = v;
        }
        Ok(())
    }

    pub(crate) fn normalize(&mut self) {
        for define in &mut self.defines {
            *define = define.trim().to_string();
        }
        self.defines.retain(|define| !define.is_empty());
        self.defines.sort();
        self.defines.dedup();
        if self.version_symbol.trim().is_empty() {
            self.version_symbol = DEFAULT_VERSION_SYMBOL.to_string();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum VersionValue {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct PreprocessorSettingsPatch {
    pub(crate) defines: Option<Vec<String>>,
    pub(crate) qt_version: Option<VersionValue>,
    pub(crate) version_symbol: Option<String>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
