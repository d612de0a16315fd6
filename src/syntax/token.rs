//! Token model for analyzed documents.
//!
//! Tokens are produced by an external parser; this module only indexes them.
//! `TokenStream` borrows the source text and precomputes the per-line data the
//! engine needs: line start offsets, the first significant token of each line,
//! and which lines begin inside a multi-line token.

use std::fmt;

/// The kind of a document token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Character data between tags, possibly whitespace-only
    Text,
    /// A name, keyword, literal, or expression atom
    Word,
    /// A structural delimiter such as `<`, `>`, `/>`, `</`, `{`, `}`, `{#`, `{:`, `{/`, `=`
    Punct,
    /// A whole `<!-- -->` comment
    Comment,
}

/// An immutable document token with byte span and source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,  // byte offset
    pub end: usize,    // byte offset (exclusive)
    pub line: usize,   // 1-based
    pub column: usize, // 0-based, in characters
}

impl Token {
    /// Whitespace tokens are text whose content trims to nothing.
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Text && self.text.trim().is_empty()
    }
}

/// Stable index of a token in its stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub usize);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed document's tokens plus the per-line index derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    line_starts: Vec<usize>,
    heads: Vec<Option<TokenId>>,
    covered: Vec<bool>,
    first_significant: Option<TokenId>,
}

impl<'s> TokenStream<'s> {
    /// Index a token vector against its source text.
    ///
    /// Tokens must be ordered by start offset. Tokens whose line numbers do
    /// not fit the source are left out of the line index.
    pub fn new(source: &'s str, tokens: Vec<Token>) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }

        let line_count = line_starts.len();
        let mut heads: Vec<Option<TokenId>> = vec![None; line_count];
        let mut covered = vec![false; line_count];
        let mut first_significant = None;

        for (index, token) in tokens.iter().enumerate() {
            if token.line == 0 || token.line > line_count {
                continue;
            }
            if token.is_whitespace() {
                // Whitespace never hides a line: the run before a line head is
                // exactly what gets checked, tokenized or not.
                continue;
            }

            // Lines that begin inside a significant multi-line token (string
            // literal, comment interior) have no head of their own.
            let last_byte = if token.end > token.start {
                token.end - 1
            } else {
                token.start
            };
            let last_line = line_of_offset(&line_starts, last_byte);
            for line in (token.line + 1)..=last_line.min(line_count) {
                covered[line - 1] = true;
            }

            if first_significant.is_none() {
                first_significant = Some(TokenId(index));
            }
            if !covered[token.line - 1] && heads[token.line - 1].is_none() {
                heads[token.line - 1] = Some(TokenId(index));
            }
        }

        Self {
            source,
            tokens,
            line_starts,
            heads,
            covered,
            first_significant,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.0)
    }

    /// Number of physical lines in the source (at least one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// First significant token starting on `line`, if the line has one and
    /// does not begin inside a significant multi-line token.
    pub fn line_head(&self, line: usize) -> Option<TokenId> {
        let idx = line.checked_sub(1)?;
        if *self.covered.get(idx)? {
            return None;
        }
        self.heads.get(idx).copied().flatten()
    }

    /// First non-whitespace token of the whole document.
    pub fn first_significant(&self) -> Option<TokenId> {
        self.first_significant
    }

    /// Byte span of the run of spaces and tabs at the start of `line`.
    pub fn leading_whitespace_span(&self, line: usize) -> Option<(usize, usize)> {
        let idx = line.checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let width = self.source[start..]
            .bytes()
            .take_while(|&b| b == b' ' || b == b'\t')
            .count();
        Some((start, start + width))
    }

    /// The leading whitespace text of `line`.
    pub fn leading_whitespace(&self, line: usize) -> Option<&'s str> {
        let (start, end) = self.leading_whitespace_span(line)?;
        Some(&self.source[start..end])
    }
}

/// 1-based line containing the given byte offset.
fn line_of_offset(line_starts: &[usize], offset: usize) -> usize {
    line_starts.partition_point(|&start| start <= offset)
}
