pub mod ast;
pub mod cst;
pub mod cst_parser;
pub mod helpers;
pub mod kind;
pub mod lexer;

use std::sync::Arc;

use crate::syntax::cst::SyntaxNode;
use crate::syntax::cst_parser::{Parser, SyntaxError};

/// Immutable syntax snapshot of one header.
#[derive(Clone)]
pub struct SyntaxTree {
    green: rowan::GreenNode,
    source: Arc<str>,
    errors: Arc<[SyntaxError]>,
}

impl SyntaxTree {
    pub fn parse(source: &str) -> Self {
        let parser = Parser::new(source);
        let (green, errors) = parser.parse();
        Self {
            green,
            source: Arc::from(source),
            errors: errors.into(),
        }
    }

    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }
}
