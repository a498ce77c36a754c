use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// `class CTK_WIDGETS_EXPORT ctkSlider` records `CTK_WIDGETS_EXPORT` → `ctkSlider`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedClass {
    pub symbol: String,
    pub class: String,
}

/// What the annotation macros of one header said before they were erased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportMetadata {
    pub exports: Vec<ExportedClass>,
    /// Classes with `Q_DECLARE_PRIVATE`; they get a private copy constructor stub.
    pub private_declared: BTreeSet<String>,
    /// Classes with `Q_DISABLE_COPY`; they get a private assignment stub.
    pub copy_disabled: BTreeSet<String>,
    /// Enum name → flags typedef name from `Q_DECLARE_FLAGS(Flags, Enum)`.
    pub flag_aliases: BTreeMap<String, String>,
    /// Namespace → enum from `Q_DECLARE_OPERATORS_FOR_FLAGS(Ns::Flags)`.
    pub operator_aliases: BTreeMap<String, String>,
}

impl ExportMetadata {
    pub fn is_exported(
        &self,
        class: &str,
    ) -> bool {
        self.exports.iter().any(|export| export.class == class)
    }

    pub fn exported_classes(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|export| export.class.as_str())
    }

    pub fn flag_alias(
        &self,
        enum_name: &str,
    ) -> Option<&str> {
        self.flag_aliases.get(enum_name).map(String::as_str)
    }

    /// Enum whose flags typedef is named `flags`.
    pub fn enum_for_flags(
        &self,
        flags: &str,
    ) -> Option<&str> {
        self.flag_aliases.iter().find(|(_, alias)| alias.as_str() == flags).map(|(enum_name, _)| enum_name.as_str())
    }

    pub(crate) fn record_export(
        &mut self,
        symbol: &str,
        class: &str,
    ) {
        if !self.exports.iter().any(|export| export.symbol == symbol && export.class == class) {
            self.exports.push(ExportedClass {
                symbol: symbol.to_string(),
                class: class.to_string(),
            });
        }
    }

    /// Distinct export symbols in first-seen order.
    pub(crate) fn export_symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        for export in &self.exports {
            if !symbols.contains(&export.symbol.as_str()) {
                symbols.push(&export.symbol);
            }
        }
        symbols
    }
}
