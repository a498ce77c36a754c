//! Header template rendering.
//!
//! A template is free text with `{placeholder}` markers. The run-level
//! markers are filled in once when the template is loaded; `{file_name}` is
//! filled in per artifact. Braces that do not name a known placeholder are
//! copied through untouched.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{
    config::OutputSettings,
    error::{Result, SipgenError},
};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").unwrap());

pub const FILE_NAME: &str = "file_name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    text: String,
}

impl HeaderTemplate {
    pub fn new(
        text: &str,
        lib_name: &str,
        copy_year: &str,
        copy_name: &str,
    ) -> Self {
        let text = fill(text, |name| match name {
            "lib_name" => Some(lib_name),
            "copy_year" => Some(copy_year),
            "copy_name" => Some(copy_name),
            _ => None,
        });
        Self { text }
    }

    /// Read the template named by `settings`, if any.
    pub fn load(settings: &OutputSettings) -> Result<Option<Self>> {
        let Some(path) = settings.header_template.as_deref() else {
            return Ok(None);
        };
        let text = read_template(path)?;
        Ok(Some(Self::new(&text, &settings.lib_name, &settings.copy_year, &settings.copy_name)))
    }

    pub fn render(
        &self,
        file_name: &str,
    ) -> String {
        fill(&self.text, |name| (name == FILE_NAME).then_some(file_name))
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SipgenError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn fill<'v>(
    text: &str,
    value: impl Fn(&str) -> Option<&'v str>,
) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match value(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
