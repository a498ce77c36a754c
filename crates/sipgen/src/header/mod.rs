pub mod lower;
pub mod model;

pub use lower::lower;
pub use model::*;

use crate::error::Result;
use crate::syntax::SyntaxTree;

/// Parse macro-erased header text into its declaration model.
pub fn parse_header(text: &str) -> Result<HeaderAst> {
    let tree = SyntaxTree::parse(text);
    lower(&tree)
}
