/// Text rendering utilities over syntax tokens and directive lines.
use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

pub fn node_text<'a>(node: &SyntaxNode, source: &'a str) -> &'a str {
    let range = node.text_range();
    let start = range.start().into();
    let end = range.end().into();
    &source[start..end]
}

/// Join type tokens the way declarations are usually written:
/// `const QMap<QString, int> &`, `unsigned long`, `char **`.
pub fn render_type(tokens: &[SyntaxToken]) -> String {
    let mut out = String::new();
    let mut prev: Option<SyntaxKind> = None;

    for token in tokens {
        let kind = token.kind();
        if let Some(prev) = prev
            && needs_space(prev, kind)
        {
            out.push(' ');
        }
        out.push_str(token.text());
        prev = Some(kind);
    }
    out
}

fn needs_space(
    prev: SyntaxKind,
    next: SyntaxKind,
) -> bool {
    if prev == SyntaxKind::Comma {
        return true;
    }
    if prev.is_word() && next.is_word() {
        return true;
    }
    if prev == SyntaxKind::Greater && next.is_word() {
        return true;
    }
    is_declarator(next) && !is_declarator(prev) && !matches!(prev, SyntaxKind::DoubleColon | SyntaxKind::Less)
}

fn is_declarator(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::Star | SyntaxKind::Amp | SyntaxKind::AndAnd)
}

/// Join tokens with a single space wherever the source separated them,
/// which collapses comments, newlines and erased macros.
pub fn render_spaced(tokens: &[SyntaxToken]) -> String {
    let mut out = String::new();
    let mut prev_end = None;

    for token in tokens {
        let range = token.text_range();
        if let Some(prev_end) = prev_end
            && range.start() != prev_end
        {
            out.push(' ');
        }
        out.push_str(token.text());
        prev_end = Some(range.end());
    }
    out
}

/// Framework annotation macros left in a declaration (`Q_DECL_DEPRECATED`,
/// `QT_DEPRECATED_X("...")`, `Q_REQUIRED_RESULT`) are dropped together with
/// their argument list. Standard attributes such as `[[nodiscard]]` are
/// dropped as well.
pub fn strip_annotation_macros(tokens: Vec<SyntaxToken>) -> Vec<SyntaxToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token.kind() == SyntaxKind::LBracket
            && iter.peek().is_some_and(|next| next.kind() == SyntaxKind::LBracket)
        {
            let mut depth = 1usize;
            for next in iter.by_ref() {
                match next.kind() {
                    SyntaxKind::LBracket => depth += 1,
                    SyntaxKind::RBracket => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    },
                    _ => {},
                }
            }
            continue;
        }
        if token.kind() != SyntaxKind::Ident || !is_annotation_macro(token.text()) {
            out.push(token);
            continue;
        }
        if iter.peek().is_some_and(|next| next.kind() == SyntaxKind::LParen) {
            let mut depth = 0usize;
            for next in iter.by_ref() {
                match next.kind() {
                    SyntaxKind::LParen => depth += 1,
                    SyntaxKind::RParen => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            break;
                        }
                    },
                    _ => {},
                }
            }
        }
    }
    out
}

pub fn is_annotation_macro(text: &str) -> bool {
    let rest = text.strip_prefix("QT_").or_else(|| text.strip_prefix("Q_"));
    rest.is_some_and(|rest| {
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    })
}

/// Canonical form of a preprocessor line used to compare directives:
/// comments removed, whitespace collapsed, no space after `#`.
pub fn normalize_directive(line: &str) -> String {
    let mut text = String::with_capacity(line.len());
    let mut rest = line;
    loop {
        let line_comment = rest.find("//");
        let block_comment = rest.find("/*");
        match (line_comment, block_comment) {
            (Some(line_at), block) if block.is_none_or(|block_at| line_at < block_at) => {
                text.push_str(&rest[..line_at]);
                break;
            },
            (_, Some(block_at)) => {
                text.push_str(&rest[..block_at]);
                text.push(' ');
                match rest[block_at + 2..].find("*/") {
                    Some(end) => rest = &rest[block_at + 2 + end + 2..],
                    None => break,
                }
            },
            _ => {
                text.push_str(rest);
                break;
            },
        }
    }

    let collapsed = text
        .replace("\\\n", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match collapsed.strip_prefix('#') {
        Some(directive) => format!("#{}", directive.trim_start()),
        None => collapsed,
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/helpers_tests.rs"]
mod tests;
