//! Conditional compilation resolution.
//!
//! Replays a header's `#if`/`#ifdef`/`#ifndef`/`#else`/`#endif` lines
//! against one fixed [`DefinitionEnvironment`] and reports the line ranges
//! whose declarations must not be emitted.

pub mod directives;
pub mod environment;
pub mod resolver;

pub use directives::{check_alignment, relevant_directives};
pub use environment::{
    DEFAULT_VERSION_SYMBOL, DefinitionEnvironment, VERSION_CHECK_MACRO, encode_version, parse_version_setting,
};
pub use resolver::{SkipRange, SkipRanges, resolve};

use crate::{error::Result, header::HeaderAst};

/// Skip ranges for one parsed header. `text` is the macro-erased source the
/// header was parsed from.
pub fn skip_ranges(
    text: &str,
    ast: &HeaderAst,
    env: &DefinitionEnvironment,
) -> Result<SkipRanges> {
    let relevant = relevant_directives(ast);
    check_alignment(text, ast, &relevant)?;
    resolve(&relevant, env)
}
