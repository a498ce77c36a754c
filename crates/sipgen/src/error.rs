use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Failure while turning one header into a SIP artifact.
#[derive(Debug)]
pub enum SipgenError {
    /// The macro-erased header could not be parsed. Aborts the whole run.
    Parse {
        line: usize,
        message: String,
    },
    /// A conditional directive reported by the parser does not line up with
    /// the erased text.
    DirectiveMisalignment {
        line: usize,
        expected: String,
        found: String,
    },
    UnresolvedEnumReference {
        enum_name: String,
        enumerator: String,
        reference: String,
        line: usize,
    },
    UnmatchedOperatorAlias {
        flags: String,
        line: usize,
    },
    UnsupportedComparisonOperator {
        operator: String,
        condition: String,
        line: usize,
    },
    InvalidVersion {
        condition: String,
        line: usize,
    },
    UnterminatedMacro {
        name: String,
        line: usize,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SipgenError {
    /// Parse failures stop the batch; everything else only drops one file.
    pub fn aborts_run(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. }
            | Self::DirectiveMisalignment { line, .. }
            | Self::UnresolvedEnumReference { line, .. }
            | Self::UnmatchedOperatorAlias { line, .. }
            | Self::UnsupportedComparisonOperator { line, .. }
            | Self::InvalidVersion { line, .. }
            | Self::UnterminatedMacro { line, .. } => Some(*line),
            Self::Io { .. } => None,
        }
    }
}

impl Display for SipgenError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Parse {
                line,
                message,
            } => write!(f, "line {line}: parse error: {message}"),
            Self::DirectiveMisalignment {
                line,
                expected,
                found,
            } => {
                write!(f, "line {line}: conditional directive mismatch: expected `{expected}`, found `{found}`")
            },
            Self::UnresolvedEnumReference {
                enum_name,
                enumerator,
                reference,
                line,
            } => {
                write!(
                    f,
                    "line {line}: enum `{enum_name}`: value of `{enumerator}` references unknown enumerator `{reference}`"
                )
            },
            Self::UnmatchedOperatorAlias {
                flags,
                line,
            } => {
                write!(f, "line {line}: Q_DECLARE_OPERATORS_FOR_FLAGS({flags}) has no matching Q_DECLARE_FLAGS")
            },
            Self::UnsupportedComparisonOperator {
                operator,
                condition,
                line,
            } => {
                write!(f, "line {line}: unsupported comparison operator `{operator}` in `{condition}`")
            },
            Self::InvalidVersion {
                condition,
                line,
            } => write!(f, "line {line}: cannot read version in `{condition}`"),
            Self::UnterminatedMacro {
                name,
                line,
            } => write!(f, "line {line}: `{name}` is missing its closing `)`"),
            Self::Io {
                path,
                source,
            } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for SipgenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A [`SipgenError`] tagged with the header it came from.
#[derive(Debug)]
pub struct FileError {
    pub file: String,
    pub error: SipgenError,
}

impl Display for FileError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}: {}", self.file, self.error)
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub type Result<T, E = SipgenError> = std::result::Result<T, E>;
