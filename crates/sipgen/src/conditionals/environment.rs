use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    config::PreprocessorSettings,
    error::{Result, SipgenError},
    header::{ConditionalDirective, ConditionalKind},
    literal::parse_integer_literal,
};

pub const DEFAULT_VERSION_SYMBOL: &str = "QT_VERSION";
pub const VERSION_CHECK_MACRO: &str = "QT_VERSION_CHECK";

/// `(major << 16) | (minor << 8) | patch`, the layout of `QT_VERSION`.
pub fn encode_version(
    major: u32,
    minor: u32,
    patch: u32,
) -> u32 {
    (major << 16) | (minor << 8) | patch
}

/// Reads a version given on the command line or in `sipgen.toml`: an integer
/// literal, dotted `5.4.0`, or `QT_VERSION_CHECK(5, 4, 0)`.
pub fn parse_version_setting(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Some(version) = parse_version_operand(text) {
        return Some(version);
    }
    let parts: Vec<&str> = text.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut numbers = [0u32; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().ok().filter(|n| *n <= 0xFF)?;
    }
    Some(encode_version(numbers[0], numbers[1], numbers[2]))
}

/// Right-hand side of a version comparison.
fn parse_version_operand(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Some(arguments) = text
        .strip_prefix(VERSION_CHECK_MACRO)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.trim_end().strip_suffix(')'))
    {
        let parts: Vec<u32> = arguments
            .split(',')
            .map(|part| parse_integer_literal(part).and_then(|n| u32::try_from(n).ok()))
            .collect::<Option<_>>()?;
        return match parts.as_slice() {
            [major, minor, patch] if *minor <= 0xFF && *patch <= 0xFF => Some(encode_version(*major, *minor, *patch)),
            _ => None,
        };
    }
    let inner = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(text);
    parse_integer_literal(inner).and_then(|n| u32::try_from(n).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    fn holds(
        self,
        left: u32,
        right: u32,
    ) -> bool {
        match self {
            Comparison::Greater => left > right,
            Comparison::GreaterOrEqual => left >= right,
            Comparison::Less => left < right,
            Comparison::LessOrEqual => left <= right,
        }
    }
}

/// The fixed target configuration: which symbols are defined and which
/// version the headers are compiled against. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionEnvironment {
    defines: BTreeSet<String>,
    version: u32,
    version_symbol: String,
}

impl DefinitionEnvironment {
    pub fn new<I, S>(
        defines: I,
        version: u32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            defines: defines.into_iter().map(Into::into).collect(),
            version,
            version_symbol: DEFAULT_VERSION_SYMBOL.to_string(),
        }
    }

    pub fn with_version_symbol(
        mut self,
        symbol: impl Into<String>,
    ) -> Self {
        self.version_symbol = symbol.into();
        self
    }

    pub fn from_settings(settings: &PreprocessorSettings) -> Self {
        Self::new(settings.defines.iter().cloned(), settings.qt_version).with_version_symbol(&settings.version_symbol)
    }

    pub fn is_defined(
        &self,
        symbol: &str,
    ) -> bool {
        self.defines.contains(symbol)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn version_symbol(&self) -> &str {
        &self.version_symbol
    }

    /// Whether the branch opened by `directive` is taken. Only meaningful
    /// for `#if`, `#ifdef` and `#ifndef`.
    pub fn is_active(
        &self,
        directive: &ConditionalDirective,
    ) -> Result<bool> {
        let condition = directive.condition.trim();
        let (name, rest) = split_symbol(condition);
        match directive.kind {
            ConditionalKind::IfDef => {
                if self.is_defined(name) {
                    return Ok(true);
                }
                if name == self.version_symbol && !rest.trim().is_empty() {
                    return self.compare_version(rest, directive);
                }
                Ok(false)
            },
            ConditionalKind::IfNDef => Ok(!self.is_defined(name)),
            ConditionalKind::If => self.evaluate_if(condition, directive),
            ConditionalKind::Else | ConditionalKind::EndIf => Ok(false),
        }
    }

    fn evaluate_if(
        &self,
        condition: &str,
        directive: &ConditionalDirective,
    ) -> Result<bool> {
        let (name, rest) = split_symbol(condition);
        if name == self.version_symbol && !rest.trim().is_empty() {
            return self.compare_version(rest, directive);
        }
        if let Some(symbol) = defined_operand(condition) {
            return Ok(self.is_defined(symbol));
        }
        if let Some(negated) = condition.strip_prefix('!')
            && let Some(symbol) = defined_operand(negated.trim_start())
        {
            return Ok(!self.is_defined(symbol));
        }
        if let Some(value) = parse_integer_literal(condition) {
            return Ok(value != 0);
        }
        if !name.is_empty() && rest.trim().is_empty() {
            return Ok(self.is_defined(name));
        }
        debug!("Treating `{}` at line {} as inactive", directive.text, directive.line);
        Ok(false)
    }

    /// `rest` is everything after the version symbol, e.g. `>= 0x050000`.
    fn compare_version(
        &self,
        rest: &str,
        directive: &ConditionalDirective,
    ) -> Result<bool> {
        let rest = rest.trim_start();
        let operator_len = rest.find(|c: char| !matches!(c, '<' | '>' | '=' | '!')).unwrap_or(rest.len());
        let (operator, operand) = rest.split_at(operator_len);
        let comparison = match operator {
            ">" => Comparison::Greater,
            ">=" => Comparison::GreaterOrEqual,
            "<" => Comparison::Less,
            "<=" => Comparison::LessOrEqual,
            _ => {
                let operator = if operator.is_empty() {
                    operand.split_whitespace().next().unwrap_or_default()
                } else {
                    operator
                };
                return Err(SipgenError::UnsupportedComparisonOperator {
                    operator: operator.to_string(),
                    condition: directive.text.clone(),
                    line: directive.line,
                });
            },
        };
        let version = parse_version_operand(operand).ok_or_else(|| SipgenError::InvalidVersion {
            condition: directive.text.clone(),
            line: directive.line,
        })?;
        Ok(comparison.holds(self.version, version))
    }
}

/// Leading identifier of a condition and whatever follows it.
fn split_symbol(condition: &str) -> (&str, &str) {
    let end = condition.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(condition.len());
    condition.split_at(end)
}

/// `X` out of `defined(X)` or `defined X`.
fn defined_operand(condition: &str) -> Option<&str> {
    let rest = condition.strip_prefix("defined")?;
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let rest = rest.trim_start();
    let symbol = match rest.strip_prefix('(') {
        Some(inner) => inner.strip_suffix(')')?.trim(),
        None => rest,
    };
    let (name, tail) = split_symbol(symbol);
    (!name.is_empty() && tail.is_empty()).then_some(name)
}

#[cfg(test)]
#[path = "../../tests/src/conditionals/environment_tests.rs"]
mod tests;
