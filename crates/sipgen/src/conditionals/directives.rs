use crate::{
    error::{Result, SipgenError},
    header::{ConditionalDirective, ConditionalKind, HeaderAst},
    syntax::helpers::normalize_directive,
};

/// Directives that gate declarations: everything the parser reported
/// except the include guard's `#ifndef` and its closing `#endif`.
pub fn relevant_directives(ast: &HeaderAst) -> Vec<ConditionalDirective> {
    let guard = guard_lines(ast);
    ast.conditionals
        .iter()
        .filter(|directive| !guard.contains(&directive.line))
        .cloned()
        .collect()
}

/// Lines of the include guard's `#ifndef` and final `#endif`.
fn guard_lines(ast: &HeaderAst) -> Vec<usize> {
    let mut lines = Vec::new();
    if ast.include_guard.is_none() {
        return lines;
    }
    if let Some(first) = ast.conditionals.first()
        && first.kind == ConditionalKind::IfNDef
    {
        lines.push(first.line);
    }
    if let Some(last) = ast.conditionals.last()
        && last.kind == ConditionalKind::EndIf
        && ast.conditionals.len() > 1
    {
        lines.push(last.line);
    }
    lines
}

/// Check that the conditional lines of the erased header text appear in
/// exactly the order and on exactly the lines the parser reported for
/// `relevant`. Macro erasure that shifted or swallowed a line shows up here.
pub fn check_alignment(
    text: &str,
    ast: &HeaderAst,
    relevant: &[ConditionalDirective],
) -> Result<()> {
    let excluded = guard_lines(ast);
    let mut expected = relevant.iter();

    for (number, directive_text) in directive_lines(text) {
        if excluded.contains(&number) {
            continue;
        }
        let normalized = normalize_directive(&directive_text);
        if !is_conditional(&normalized) || !relevant.iter().any(|directive| directive.text == normalized) {
            continue;
        }

        match expected.next() {
            Some(directive) if directive.text == normalized && directive.line == number => {},
            Some(directive) => {
                return Err(SipgenError::DirectiveMisalignment {
                    line: number,
                    expected: format!("{} (line {})", directive.text, directive.line),
                    found: normalized,
                });
            },
            None => {
                return Err(SipgenError::DirectiveMisalignment {
                    line: number,
                    expected: "no further conditional".to_string(),
                    found: normalized,
                });
            },
        }
    }

    if let Some(directive) = expected.next() {
        return Err(SipgenError::DirectiveMisalignment {
            line: directive.line,
            expected: directive.text.clone(),
            found: "end of file".to_string(),
        });
    }
    Ok(())
}

/// Every line starting with `#`, joined with its `\` continuation lines,
/// keyed by the 1-based line it starts on.
fn directive_lines(text: &str) -> Vec<(usize, String)> {
    let lines: Vec<&str> = text.lines().collect();
    let mut found = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let start = idx;
        let trimmed = lines[idx].trim_start();
        idx += 1;
        if !trimmed.starts_with('#') {
            continue;
        }
        let mut joined = String::new();
        let mut current = trimmed;
        while let Some(continued) = current.trim_end().strip_suffix('\\')
            && idx < lines.len()
        {
            joined.push_str(continued);
            joined.push(' ');
            current = lines[idx];
            idx += 1;
        }
        joined.push_str(current);
        found.push((start + 1, joined));
    }
    found
}

fn is_conditional(directive: &str) -> bool {
    ["#if", "#else", "#endif"].iter().any(|prefix| directive.starts_with(prefix))
}

#[cfg(test)]
#[path = "../../tests/src/conditionals/directives_tests.rs"]
mod tests;
