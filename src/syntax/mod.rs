//! Document Syntax
//!
//! Token and tree types consumed by the indentation engine. The engine never
//! parses source text itself; an external parser produces these structures.

pub mod token;
pub mod tree;

pub use token::{Token, TokenId, TokenKind, TokenStream};
pub use tree::{
    Attribute, AttributePair, AttributeValue, Clause, ClauseTag, CommentNode, ControlBlock,
    ControlKind, Document, Element, EmbeddedBlock, EndTag, MustacheTag, Node, StartTag, TextRun,
};
