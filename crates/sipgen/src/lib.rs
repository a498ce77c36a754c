pub mod conditionals;
pub mod config;
pub mod error;
pub mod header;
pub mod literal;
pub mod macros;
pub mod pipeline;
pub mod synth;
pub mod syntax;
pub mod text_pos;

pub use conditionals::{DefinitionEnvironment, SkipRange, SkipRanges, skip_ranges};
pub use config::Settings;
pub use error::{FileError, Result, SipgenError};
pub use header::{HeaderAst, parse_header};
pub use macros::{ExportMetadata, Extraction, extract};
pub use pipeline::{RunSummary, convert_header, run};
pub use synth::{Synthesis, synthesize};
