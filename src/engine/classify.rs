//! Token Classification
//!
//! Categorizes tokens into whitespace, content, and structural delimiters,
//! and answers adjacency queries over the significant tokens of a stream.

use crate::syntax::{Token, TokenId, TokenKind, TokenStream};

/// The indentation-relevant class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Text whose content trims to nothing
    Whitespace,
    /// Names, words, literals, comments
    Content,
    /// Delimiters that open or close structure
    Structural,
}

/// Classify a single token.
pub fn classify(token: &Token) -> TokenClass {
    if token.is_whitespace() {
        TokenClass::Whitespace
    } else if token.kind == TokenKind::Punct {
        TokenClass::Structural
    } else {
        TokenClass::Content
    }
}

/// The nearest significant token after `id`, if any.
pub fn next_significant(stream: &TokenStream<'_>, id: TokenId) -> Option<TokenId> {
    let tokens = stream.tokens();
    tokens
        .iter()
        .enumerate()
        .skip(id.0 + 1)
        .find(|(_, token)| !token.is_whitespace())
        .map(|(index, _)| TokenId(index))
}

/// The nearest significant token before `id`, if any.
pub fn prev_significant(stream: &TokenStream<'_>, id: TokenId) -> Option<TokenId> {
    let tokens = stream.tokens();
    let end = id.0.min(tokens.len());
    tokens[..end]
        .iter()
        .enumerate()
        .rev()
        .find(|(_, token)| !token.is_whitespace())
        .map(|(index, _)| TokenId(index))
}
