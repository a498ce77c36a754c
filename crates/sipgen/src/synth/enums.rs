//! Enumerator value resolution.
//!
//! Values are copied as written unless they combine terms with `+` or `|`,
//! in which case they are folded to a decimal number. The evaluator knows
//! integer literals, `+`, `<<`, `|`, parentheses and the names of
//! enumerators already resolved in the same enum. Nothing else is evaluated.

use tracing::debug;

use crate::{
    error::{Result, SipgenError},
    header::EnumDescriptor,
    literal::parse_integer_literal,
};

/// One enumerator as it will be written. `value` is `None` when no value
/// can be given, in which case the enumerator is written bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEnumerator {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The expression uses something outside the evaluator's grammar.
    Unsupported,
    /// A name that is not a resolved enumerator.
    UnknownName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(i64),
    Name(String),
    Plus,
    Shift,
    Pipe,
    Open,
    Close,
}

fn tokenize(expression: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            },
            '<' => {
                chars.next();
                if chars.next().map(|(_, c)| c) != Some('<') {
                    return None;
                }
                tokens.push(Token::Shift);
            },
            '+' | '|' | '(' | ')' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '|' => Token::Pipe,
                    '(' => Token::Open,
                    _ => Token::Close,
                });
            },
            c if c.is_ascii_alphanumeric() || c == '_' || c == ':' => {
                let mut end = start;
                while let Some(&(idx, c)) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_' || c == ':') {
                        break;
                    }
                    end = idx + c.len_utf8();
                    chars.next();
                }
                let word = &expression[start..end];
                if word.starts_with(|c: char| c.is_ascii_digit()) {
                    tokens.push(Token::Number(parse_integer_literal(word)?));
                } else {
                    tokens.push(Token::Name(word.to_string()));
                }
            },
            _ => return None,
        }
    }
    Some(tokens)
}

struct Evaluator<'a, F> {
    tokens: &'a [Token],
    pos: usize,
    lookup: F,
}

impl<F> Evaluator<'_, F>
where
    F: Fn(&str) -> Option<i64>,
{
    // C precedence: `+` over `<<` over `|`.
    fn bit_or(&mut self) -> Result<i64, EvalError> {
        let mut value = self.shift()?;
        while self.tokens.get(self.pos) == Some(&Token::Pipe) {
            self.pos += 1;
            value |= self.shift()?;
        }
        Ok(value)
    }

    fn shift(&mut self) -> Result<i64, EvalError> {
        let mut value = self.sum()?;
        while self.tokens.get(self.pos) == Some(&Token::Shift) {
            self.pos += 1;
            let amount = u32::try_from(self.sum()?).map_err(|_| EvalError::Unsupported)?;
            value = value.checked_shl(amount).ok_or(EvalError::Unsupported)?;
        }
        Ok(value)
    }

    fn sum(&mut self) -> Result<i64, EvalError> {
        let mut value = self.term()?;
        while self.tokens.get(self.pos) == Some(&Token::Plus) {
            self.pos += 1;
            value = value.checked_add(self.term()?).ok_or(EvalError::Unsupported)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<i64, EvalError> {
        let token = self.tokens.get(self.pos).ok_or(EvalError::Unsupported)?;
        self.pos += 1;
        match token {
            Token::Number(value) => Ok(*value),
            Token::Name(name) => (self.lookup)(name).ok_or_else(|| EvalError::UnknownName(name.clone())),
            Token::Open => {
                let value = self.bit_or()?;
                if self.tokens.get(self.pos) != Some(&Token::Close) {
                    return Err(EvalError::Unsupported);
                }
                self.pos += 1;
                Ok(value)
            },
            Token::Plus | Token::Shift | Token::Pipe | Token::Close => Err(EvalError::Unsupported),
        }
    }
}

/// Evaluate `expression`, looking names up with `lookup`.
pub fn evaluate(
    expression: &str,
    lookup: impl Fn(&str) -> Option<i64>,
) -> Result<i64, EvalError> {
    let tokens = tokenize(expression).ok_or(EvalError::Unsupported)?;
    let mut evaluator = Evaluator {
        tokens: &tokens,
        pos: 0,
        lookup,
    };
    let value = evaluator.bit_or()?;
    if evaluator.pos != tokens.len() {
        return Err(EvalError::Unsupported);
    }
    Ok(value)
}

/// Resolve every enumerator of `descriptor`. `qualified_name` names the
/// enum in error messages.
///
/// A `+`/`|` expression naming an earlier enumerator whose value is not known
/// is kept as written. Only names that are not earlier enumerators fail.
pub fn resolve_enumerators(
    descriptor: &EnumDescriptor,
    qualified_name: &str,
) -> Result<Vec<ResolvedEnumerator>> {
    let mut known: Vec<(&str, i64)> = Vec::new();
    let mut declared: Vec<&str> = Vec::new();
    let mut previous: Option<i64> = Some(-1);
    let mut resolved = Vec::with_capacity(descriptor.enumerators.len());

    for enumerator in &descriptor.enumerators {
        let lookup = |name: &str| known.iter().rev().find(|(known, _)| *known == name).map(|(_, value)| *value);
        let (text, numeric) = match enumerator.value.as_deref().map(str::trim) {
            None => {
                let next = previous.and_then(|value| value.checked_add(1));
                (next.map(|value| value.to_string()), next)
            },
            Some(expression) if expression.contains('+') || expression.contains('|') => {
                match evaluate(expression, lookup) {
                    Ok(value) => (Some(value.to_string()), Some(value)),
                    Err(EvalError::UnknownName(reference)) if declared.contains(&reference.as_str()) => {
                        debug!(
                            "Keeping `{expression}` of {qualified_name} at line {} as written: `{reference}` has no known value",
                            descriptor.line
                        );
                        (Some(expression.to_string()), None)
                    },
                    Err(EvalError::UnknownName(reference)) => {
                        return Err(SipgenError::UnresolvedEnumReference {
                            enum_name: qualified_name.to_string(),
                            enumerator: enumerator.name.clone(),
                            reference,
                            line: descriptor.line,
                        });
                    },
                    Err(EvalError::Unsupported) => {
                        debug!("Keeping `{expression}` of {qualified_name} at line {} as written", descriptor.line);
                        (Some(expression.to_string()), None)
                    },
                }
            },
            Some(expression) => {
                let numeric = parse_integer_literal(expression)
                    .or_else(|| expression.strip_prefix('-').and_then(parse_integer_literal).map(|value| -value))
                    .or_else(|| evaluate(expression, lookup).ok());
                (Some(expression.to_string()), numeric)
            },
        };

        if let Some(value) = numeric {
            known.push((&enumerator.name, value));
        }
        declared.push(&enumerator.name);
        previous = numeric;
        resolved.push(ResolvedEnumerator {
            name: enumerator.name.clone(),
            value: text,
        });
    }
    Ok(resolved)
}

#[cfg(test)]
#[path = "../../tests/src/synth/enums_tests.rs"]
mod tests;
