use serde::Serialize;

use super::DefinitionEnvironment;
use crate::{
    error::{Result, SipgenError},
    header::{ConditionalDirective, ConditionalKind},
};

/// Closed interval of 1-based lines belonging to a branch that is not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkipRange {
    pub start: usize,
    pub end: usize,
}

impl SkipRange {
    pub fn contains(
        &self,
        line: usize,
    ) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Ranges in the order their branches closed. Never merged or sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkipRanges {
    ranges: Vec<SkipRange>,
}

impl SkipRanges {
    pub fn is_skipped(
        &self,
        line: usize,
    ) -> bool {
        self.ranges.iter().any(|range| range.contains(line))
    }

    pub fn as_slice(&self) -> &[SkipRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl From<Vec<SkipRange>> for SkipRanges {
    fn from(ranges: Vec<SkipRange>) -> Self {
        Self { ranges }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Opened where lines were being kept; its condition was evaluated.
    Evaluated,
    /// Opened inside a branch already being skipped; the enclosing range covers it.
    Dormant,
}

/// Replay `directives` against `env` and collect the line ranges of every
/// branch that is not taken.
///
/// Nothing is kept until a directive says so: the state starts out
/// skipping and returns to skipping after each top-level `#endif`. Lines
/// outside every conditional are never in a range, as ranges only close at
/// `#else` or `#endif`.
pub fn resolve(
    directives: &[ConditionalDirective],
    env: &DefinitionEnvironment,
) -> Result<SkipRanges> {
    let mut ranges = Vec::new();
    let mut skipping = true;
    let mut pending_start: Option<usize> = None;
    let mut frames: Vec<Frame> = Vec::new();

    for directive in directives {
        match directive.kind {
            ConditionalKind::If | ConditionalKind::IfDef | ConditionalKind::IfNDef => {
                if skipping && !frames.is_empty() {
                    frames.push(Frame::Dormant);
                    continue;
                }
                frames.push(Frame::Evaluated);
                skipping = !env.is_active(directive)?;
                if skipping {
                    pending_start = Some(directive.line);
                }
            },
            ConditionalKind::Else => {
                match frames.last() {
                    None => return Err(unopened(directive)),
                    Some(Frame::Dormant) => continue,
                    Some(Frame::Evaluated) => {},
                }
                skipping = !skipping;
                if skipping {
                    pending_start = Some(directive.line);
                } else {
                    close(&mut ranges, pending_start.take(), directive.line);
                }
            },
            ConditionalKind::EndIf => {
                let Some(frame) = frames.pop() else {
                    return Err(unopened(directive));
                };
                if frame == Frame::Dormant {
                    continue;
                }
                if skipping {
                    close(&mut ranges, pending_start.take(), directive.line);
                }
                // A nested block can only have been evaluated inside a kept branch.
                skipping = frames.is_empty();
            },
        }
    }

    if !frames.is_empty()
        && let Some(last) = directives.last()
    {
        return Err(SipgenError::DirectiveMisalignment {
            line: last.line,
            expected: "#endif".to_string(),
            found: "end of file".to_string(),
        });
    }

    Ok(SkipRanges::from(ranges))
}

fn close(
    ranges: &mut Vec<SkipRange>,
    start: Option<usize>,
    end: usize,
) {
    if let Some(start) = start {
        ranges.push(SkipRange { start, end });
    }
}

fn unopened(directive: &ConditionalDirective) -> SipgenError {
    SipgenError::DirectiveMisalignment {
        line: directive.line,
        expected: "#if, #ifdef or #ifndef".to_string(),
        found: directive.text.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/src/conditionals/resolver_tests.rs"]
mod tests;
