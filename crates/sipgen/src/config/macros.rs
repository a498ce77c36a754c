use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Annotation macros removed before a header is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroSettings {
    /// Literal text replacements applied first.
    pub substitutions: BTreeMap<String, String>,
    /// Bare tokens erased wherever they appear as a whole word.
    pub erased_tokens: Vec<String>,
    /// Macros erased from the name through the end of their line.
    pub line_macros: Vec<String>,
}

impl Default for MacroSettings {
    fn default() -> Self {
        Self {
            substitutions: BTreeMap::from([("Qt::UserRole".to_string(), "32".to_string())]),
            erased_tokens: vec!["Q_OBJECT".to_string(), "Q_INVOKABLE".to_string()],
            line_macros: ["Q_PRIVATE_SLOT", "Q_PROPERTY", "Q_ENUMS", "Q_FLAGS", "Q_DECLARE_PUBLIC"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl MacroSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: MacroSettingsPatch,
    ) {
        if let Some(v) = patch.substitutions {
            self.substitutions = v;
        }
        if let Some(v) = patch.erased_tokens {
            self.erased_tokens = v;
        }
        if let Some(v) = patch.line_macros {
            self.line_macros = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        // Replacements must not move declarations to another line.
        self.substitutions.retain(|from, to| !from.is_empty() && !from.contains('\n') && !to.contains('\n'));
        self.erased_tokens.retain(|token| !token.trim().is_empty());
        self.line_macros.retain(|name| !name.trim().is_empty());
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct MacroSettingsPatch {
    pub(crate) substitutions: Option<BTreeMap<String, String>>,
    pub(crate) erased_tokens: Option<Vec<String>>,
    pub(crate) line_macros: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
