//! Qt annotation macro removal.
//!
//! Runs before parsing: every recognized macro is blanked out of the header
//! text and whatever it declared is recorded in [`ExportMetadata`]. Erasure
//! keeps newlines, so a line number in the erased text is the same line in
//! the original header.

pub mod metadata;
pub mod scanner;

pub use metadata::{ExportMetadata, ExportedClass};
use once_cell::sync::Lazy;
use regex::Regex;
pub use scanner::{Invocation, MacroScanner, erase, erase_all};
use tracing::debug;

use crate::{
    config::MacroSettings,
    error::{Result, SipgenError},
    text_pos::LineIndex,
};

const DECLARE_FLAGS: &str = "Q_DECLARE_FLAGS";
const DECLARE_OPERATORS_FOR_FLAGS: &str = "Q_DECLARE_OPERATORS_FOR_FLAGS";
const DECLARE_PRIVATE: &str = "Q_DECLARE_PRIVATE";
const DISABLE_COPY: &str = "Q_DISABLE_COPY";

static EXPORT_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:class|struct)[ \t]+(\w+_EXPORT)[ \t]+(\w+)").unwrap());

/// Header text with annotation macros erased, plus what they declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub metadata: ExportMetadata,
}

pub fn extract(
    source: &str,
    settings: &MacroSettings,
) -> Result<Extraction> {
    let mut text = source.to_string();
    for (from, to) in &settings.substitutions {
        if text.contains(from.as_str()) {
            text = text.replace(from.as_str(), to);
        }
    }

    for token in &settings.erased_tokens {
        let found = MacroScanner::new(token).words(&text);
        erase_all(&mut text, found);
    }
    for name in &settings.line_macros {
        let found = MacroScanner::new(name).line_extents(&text);
        erase_all(&mut text, found);
    }

    let mut metadata = ExportMetadata::default();

    // Flags first: operator declarations refer back to them.
    for (arguments, line) in take_invocations(&mut text, DECLARE_FLAGS)? {
        let arguments: String = arguments.split_whitespace().collect();
        match arguments.split_once(',') {
            Some((flags, enum_name)) if !flags.is_empty() && !enum_name.is_empty() && !enum_name.contains(',') => {
                metadata.flag_aliases.insert(enum_name.to_string(), flags.to_string());
            },
            _ => debug!("line {line}: ignoring {DECLARE_FLAGS}({arguments})"),
        }
    }

    for (arguments, line) in take_invocations(&mut text, DECLARE_OPERATORS_FOR_FLAGS)? {
        let arguments: String = arguments.split_whitespace().collect();
        let (namespace, flags) = arguments.rsplit_once("::").unwrap_or(("", arguments.as_str()));
        let Some(enum_name) = metadata.enum_for_flags(flags) else {
            return Err(SipgenError::UnmatchedOperatorAlias {
                flags: arguments,
                line,
            });
        };
        let enum_name = enum_name.to_string();
        metadata.operator_aliases.insert(namespace.to_string(), enum_name);
    }

    for (arguments, _) in take_invocations(&mut text, DECLARE_PRIVATE)? {
        metadata.private_declared.insert(arguments.trim().to_string());
    }
    for (arguments, _) in take_invocations(&mut text, DISABLE_COPY)? {
        metadata.copy_disabled.insert(arguments.trim().to_string());
    }

    for captures in EXPORT_DECLARATION.captures_iter(&text) {
        metadata.record_export(&captures[1], &captures[2]);
    }
    let symbols: Vec<String> = metadata.export_symbols().into_iter().map(str::to_string).collect();
    for symbol in &symbols {
        let found = MacroScanner::new(symbol).words(&text);
        erase_all(&mut text, found);
    }

    debug!(
        "Erased annotation macros: {} exports, {} flag aliases",
        metadata.exports.len(),
        metadata.flag_aliases.len()
    );
    Ok(Extraction { text, metadata })
}

/// Erase every `name(...)` and return each argument text with its line.
fn take_invocations(
    text: &mut String,
    name: &str,
) -> Result<Vec<(String, usize)>> {
    let scanner = MacroScanner::new(name);
    let invocations = scanner.invocations(text).map_err(|offset| SipgenError::UnterminatedMacro {
        name: name.to_string(),
        line: LineIndex::new(text).line_of(offset),
    })?;
    if invocations.is_empty() {
        return Ok(Vec::new());
    }

    let index = LineIndex::new(text);
    let taken = invocations
        .iter()
        .map(|invocation| (text[invocation.arguments.clone()].to_string(), index.line_of(invocation.span.start)))
        .collect();
    erase_all(text, invocations.into_iter().map(|invocation| invocation.span));
    Ok(taken)
}

#[cfg(test)]
#[path = "../../tests/src/macros/extract_tests.rs"]
mod tests;
