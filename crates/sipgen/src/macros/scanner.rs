use std::ops::Range;

/// One `NAME(arguments)` occurrence in header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// From the first byte of the name through the closing `)`.
    pub span: Range<usize>,
    pub arguments: Range<usize>,
}

/// Finds occurrences of one macro name as a whole word.
pub struct MacroScanner<'a> {
    name: &'a str,
}

impl<'a> MacroScanner<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// Every whole-word occurrence of the name.
    pub fn words(
        &self,
        text: &str,
    ) -> Vec<Range<usize>> {
        if self.name.is_empty() {
            return Vec::new();
        }
        text.match_indices(self.name)
            .map(|(start, _)| start..start + self.name.len())
            .filter(|range| {
                let before = text[..range.start].chars().next_back();
                let after = text[range.end..].chars().next();
                !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
            })
            .collect()
    }

    /// Every `NAME(...)` invocation. The argument list ends at the first `)`;
    /// nested parentheses are not supported. `Err` carries the offset of an
    /// invocation with no closing `)`.
    pub fn invocations(
        &self,
        text: &str,
    ) -> Result<Vec<Invocation>, usize> {
        let mut found = Vec::new();
        for (start, open) in self.calls(text) {
            let Some(close) = text[open + 1..].find(')') else {
                return Err(start);
            };
            let close = open + 1 + close;
            found.push(Invocation {
                span: start..close + 1,
                arguments: open + 1..close,
            });
        }
        Ok(found)
    }

    /// From each `NAME(` to the end of its line, newline excluded.
    pub fn line_extents(
        &self,
        text: &str,
    ) -> Vec<Range<usize>> {
        self.calls(text)
            .into_iter()
            .map(|(start, _)| {
                let end = text[start..].find('\n').map(|idx| start + idx).unwrap_or(text.len());
                start..end
            })
            .collect()
    }

    /// `(name start, offset of '(')` for each call-shaped occurrence.
    fn calls(
        &self,
        text: &str,
    ) -> Vec<(usize, usize)> {
        self.words(text)
            .into_iter()
            .filter_map(|range| {
                let rest = &text[range.end..];
                let gap = rest.len() - rest.trim_start_matches([' ', '\t']).len();
                rest[gap..].starts_with('(').then_some((range.start, range.end + gap))
            })
            .collect()
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Blank out `range`, keeping newlines and byte offsets so line numbers in
/// the erased text still match the original header.
pub fn erase(
    text: &mut String,
    range: Range<usize>,
) {
    let replacement: String = text[range.clone()]
        .chars()
        .flat_map(|c| {
            let (fill, width) = if c == '\n' { ('\n', 1) } else { (' ', c.len_utf8()) };
            std::iter::repeat_n(fill, width)
        })
        .collect();
    text.replace_range(range, &replacement);
}

/// Erase ranges found in one pass over the text. Overlaps are harmless
/// since erasing keeps offsets stable.
pub fn erase_all(
    text: &mut String,
    ranges: impl IntoIterator<Item = Range<usize>>,
) {
    for range in ranges {
        erase(text, range);
    }
}

#[cfg(test)]
#[path = "../../tests/src/macros/scanner_tests.rs"]
mod tests;
