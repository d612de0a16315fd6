//! Shared fixture support for integration tests.
//!
//! The engine consumes a token stream and document tree produced by an
//! external parser. For tests, this module builds both from literal template
//! sources covering the constructs the engine knows: elements, attributes,
//! templated expressions, control blocks, script/style blocks, and comments.
//! It is deliberately strict and panics on malformed fixtures.

#![allow(dead_code)]

use template_indent::config::IndentOptions;
use template_indent::engine::{apply_edits, build_graph, LineRecord, Resolver};
use template_indent::report::{check_document, IndentReport};
use template_indent::syntax::{
    Attribute, AttributePair, AttributeValue, Clause, ClauseTag, CommentNode, ControlBlock,
    ControlKind, Document, Element, EmbeddedBlock, EndTag, MustacheTag, Node, StartTag, TextRun,
    Token, TokenId, TokenKind, TokenStream,
};

/// Elements that never take children or an end tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "input", "img", "hr", "meta", "link"];

/// Parse a fixture source into the engine's input pair.
pub fn parse(source: &str) -> (Document, TokenStream<'_>) {
    let mut parser = Parser::new(source);
    let children = parser.parse_nodes();
    assert!(
        parser.pos >= source.len(),
        "unparsed fixture input at byte {}",
        parser.pos
    );
    (Document { children }, TokenStream::new(source, parser.tokens))
}

/// Parse and check a fixture with the given options.
pub fn check(source: &str, options: &IndentOptions) -> IndentReport {
    let (doc, stream) = parse(source);
    check_document(&doc, &stream, options).expect("analysis pass")
}

/// Parse and check a fixture with default options.
pub fn check_default(source: &str) -> IndentReport {
    check(source, &IndentOptions::default())
}

/// Parse, check, and apply all fixes.
pub fn fix(source: &str, options: &IndentOptions) -> String {
    let report = check(source, options);
    apply_edits(source, &report.fixes())
}

/// Resolved line records for a fixture, for direct expectations.
pub fn records(source: &str, options: &IndentOptions) -> Vec<LineRecord> {
    let (doc, stream) = parse(source);
    let graph = build_graph(&doc, &stream, options);
    Resolver::new(&stream, &graph, options)
        .collect::<Result<Vec<_>, _>>()
        .expect("analysis pass")
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Parser<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    tokens: Vec<Token>,
    line_starts: Vec<usize>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            line_starts,
        }
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek_str(&self, text: &str) -> bool {
        self.source[self.pos..].starts_with(text)
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) -> TokenId {
        let line = self.line_starts.partition_point(|&s| s <= start);
        let line_start = self.line_starts[line - 1];
        let column = self.source[line_start..start].chars().count();
        let id = TokenId(self.tokens.len());
        self.tokens.push(Token {
            kind,
            text: self.source[start..end].to_string(),
            start,
            end,
            line,
            column,
        });
        id
    }

    fn punct(&mut self, text: &str) -> TokenId {
        assert!(
            self.peek_str(text),
            "expected '{}' at byte {}",
            text,
            self.pos
        );
        let start = self.pos;
        self.pos += text.len();
        self.push(TokenKind::Punct, start, self.pos)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len()
            && matches!(self.bytes[self.pos], b' ' | b'\t' | b'\n' | b'\r')
        {
            self.pos += 1;
        }
    }

    fn take_name(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len()
            && matches!(
                self.bytes[self.pos],
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b':' | b'@' | b'.'
            )
        {
            self.pos += 1;
        }
        assert!(self.pos > start, "expected a name at byte {start}");
    }

    fn parse_nodes(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut text_tokens: Vec<TokenId> = Vec::new();
        loop {
            if self.at_eof() || self.peek_str("</") || self.peek_str("{:") || self.peek_str("{/") {
                break;
            }
            if self.peek_str("<!--") {
                flush_text(&mut nodes, &mut text_tokens);
                nodes.push(self.parse_comment());
            } else if self.peek_str("<") {
                flush_text(&mut nodes, &mut text_tokens);
                nodes.push(self.parse_element());
            } else if self.peek_str("{#") {
                flush_text(&mut nodes, &mut text_tokens);
                nodes.push(self.parse_control_block());
            } else if self.peek_str("{") {
                flush_text(&mut nodes, &mut text_tokens);
                nodes.push(Node::Mustache(self.parse_mustache()));
            } else {
                let start = self.pos;
                let stop = self.find_text_end();
                self.text_region_tokens(start, stop, &mut text_tokens);
                self.pos = stop;
            }
        }
        flush_text(&mut nodes, &mut text_tokens);
        nodes
    }

    fn find_text_end(&self) -> usize {
        self.source[self.pos..]
            .find(['<', '{'])
            .map(|i| self.pos + i)
            .unwrap_or(self.source.len())
    }

    /// Emit one token per line of a text region: the trimmed content run, or
    /// the raw whitespace when the line holds nothing else.
    fn text_region_tokens(&mut self, start: usize, end: usize, out: &mut Vec<TokenId>) {
        let mut cursor = start;
        while cursor < end {
            let line_end = self.source[cursor..end]
                .find('\n')
                .map(|i| cursor + i)
                .unwrap_or(end);
            let segment = &self.source[cursor..line_end];
            let lead = segment.len() - segment.trim_start().len();
            let content_start = cursor + lead;
            let content_end = cursor + segment.trim_end().len();
            if content_end > content_start {
                out.push(self.push(TokenKind::Text, content_start, content_end));
            } else if line_end > cursor {
                out.push(self.push(TokenKind::Text, cursor, line_end));
            }
            cursor = line_end + 1;
        }
    }

    fn parse_comment(&mut self) -> Node {
        let start = self.pos;
        let end = self.source[start..]
            .find("-->")
            .map(|i| start + i + 3)
            .unwrap_or_else(|| panic!("unterminated comment at byte {start}"));
        self.pos = end;
        let token = self.push(TokenKind::Comment, start, end);
        Node::Comment(CommentNode { token })
    }

    fn parse_element(&mut self) -> Node {
        let open = self.punct("<");
        let name_start = self.pos;
        self.take_name();
        let tag_name = self.source[name_start..self.pos].to_string();
        let name = self.push(TokenKind::Word, name_start, self.pos);

        let (attributes, close, self_closing) = self.parse_attributes();
        let start_tag = StartTag {
            open,
            name,
            attributes,
            close,
        };

        if !self_closing && (tag_name == "script" || tag_name == "style") {
            let content = self.embedded_content(&tag_name);
            let end_tag = self.parse_end_tag();
            let block = EmbeddedBlock {
                start_tag,
                content,
                end_tag,
            };
            return if tag_name == "script" {
                Node::Script(block)
            } else {
                Node::Style(block)
            };
        }

        if self_closing || VOID_ELEMENTS.contains(&tag_name.as_str()) {
            return Node::Element(Element {
                start_tag,
                children: Vec::new(),
                end_tag: None,
            });
        }

        let children = self.parse_nodes();
        let end_tag = if self.peek_str("</") {
            Some(self.parse_end_tag())
        } else {
            None
        };
        Node::Element(Element {
            start_tag,
            children,
            end_tag,
        })
    }

    fn parse_attributes(&mut self) -> (Vec<Attribute>, TokenId, bool) {
        let mut attributes = Vec::new();
        loop {
            self.skip_ws();
            if self.peek_str("/>") {
                let close = self.punct("/>");
                return (attributes, close, true);
            }
            if self.peek_str(">") {
                let close = self.punct(">");
                return (attributes, close, false);
            }
            if self.peek_str("{") {
                attributes.push(Attribute::Shorthand(self.parse_mustache()));
                continue;
            }

            let name_start = self.pos;
            self.take_name();
            let name = self.push(TokenKind::Word, name_start, self.pos);
            if self.peek_str("=") {
                let eq = self.punct("=");
                self.skip_ws();
                let value = if self.peek_str("{") {
                    AttributeValue::Mustache(self.parse_mustache())
                } else {
                    AttributeValue::Literal(self.quoted_literal())
                };
                attributes.push(Attribute::Pair(AttributePair {
                    name,
                    eq: Some(eq),
                    value: Some(value),
                }));
            } else {
                attributes.push(Attribute::Pair(AttributePair {
                    name,
                    eq: None,
                    value: None,
                }));
            }
        }
    }

    fn quoted_literal(&mut self) -> TokenId {
        let quote = self.bytes[self.pos];
        assert!(
            quote == b'"' || quote == b'\'',
            "expected a quoted value at byte {}",
            self.pos
        );
        let start = self.pos;
        let body = &self.source[self.pos + 1..];
        let closing = body
            .find(quote as char)
            .unwrap_or_else(|| panic!("unterminated literal at byte {start}"));
        self.pos = start + 1 + closing + 1;
        self.push(TokenKind::Word, start, self.pos)
    }

    fn parse_mustache(&mut self) -> MustacheTag {
        let open = self.punct("{");
        let expression = self.expression_tokens();
        let close = self.punct("}");
        MustacheTag {
            open,
            expression,
            close,
        }
    }

    /// Whitespace-separated expression chunks up to the matching `}`.
    /// Strings keep their spaces; nested braces stay inside one chunk.
    fn expression_tokens(&mut self) -> Vec<TokenId> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        let mut chunk_start: Option<usize> = None;
        while self.pos < self.bytes.len() {
            let byte = self.bytes[self.pos];
            match byte {
                b'}' if depth == 0 => break,
                b' ' | b'\t' | b'\n' | b'\r' => {
                    if let Some(start) = chunk_start.take() {
                        tokens.push(self.push(TokenKind::Word, start, self.pos));
                    }
                    self.pos += 1;
                }
                b'"' | b'\'' | b'`' => {
                    if chunk_start.is_none() {
                        chunk_start = Some(self.pos);
                    }
                    self.skip_string(byte);
                }
                _ => {
                    if byte == b'{' {
                        depth += 1;
                    } else if byte == b'}' {
                        depth -= 1;
                    }
                    if chunk_start.is_none() {
                        chunk_start = Some(self.pos);
                    }
                    self.pos += 1;
                }
            }
        }
        if let Some(start) = chunk_start.take() {
            tokens.push(self.push(TokenKind::Word, start, self.pos));
        }
        tokens
    }

    fn skip_string(&mut self, quote: u8) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            let byte = self.bytes[self.pos];
            self.pos += 1;
            if byte == b'\\' {
                self.pos += 1;
            } else if byte == quote {
                return;
            }
        }
        panic!("unterminated string in expression");
    }

    fn parse_control_block(&mut self) -> Node {
        let first_tag = self.clause_tag("{#");
        let kind = match self.tokens[first_tag.keyword.0].text.as_str() {
            "if" => ControlKind::If,
            "each" => ControlKind::Each,
            "await" => ControlKind::Await,
            "key" => ControlKind::Key,
            other => panic!("unknown control keyword '{other}'"),
        };

        let mut clauses = Vec::new();
        let mut tag = first_tag;
        loop {
            let children = self.parse_nodes();
            clauses.push(Clause { tag, children });
            if self.peek_str("{:") {
                tag = self.clause_tag("{:");
                continue;
            }
            let close = self.clause_tag("{/");
            return Node::ControlBlock(ControlBlock {
                kind,
                clauses,
                close,
            });
        }
    }

    fn clause_tag(&mut self, opener: &str) -> ClauseTag {
        let open = self.punct(opener);
        self.skip_ws();
        let keyword_start = self.pos;
        self.take_name();
        let keyword = self.push(TokenKind::Word, keyword_start, self.pos);
        let expression = self.expression_tokens();
        let close = self.punct("}");
        ClauseTag {
            open,
            keyword,
            expression,
            close,
        }
    }

    /// Raw script/style content as one trimmed token per non-blank line.
    fn embedded_content(&mut self, tag_name: &str) -> Vec<TokenId> {
        let closer = format!("</{tag_name}");
        let start = self.pos;
        let end = self.source[start..]
            .find(&closer)
            .map(|i| start + i)
            .unwrap_or_else(|| panic!("missing {closer} for embedded block"));

        let mut tokens = Vec::new();
        let mut cursor = start;
        while cursor < end {
            let line_end = self.source[cursor..end]
                .find('\n')
                .map(|i| cursor + i)
                .unwrap_or(end);
            let segment = &self.source[cursor..line_end];
            let lead = segment.len() - segment.trim_start().len();
            let content_start = cursor + lead;
            let content_end = cursor + segment.trim_end().len();
            if content_end > content_start {
                tokens.push(self.push(TokenKind::Text, content_start, content_end));
            }
            cursor = line_end + 1;
        }
        self.pos = end;
        tokens
    }

    fn parse_end_tag(&mut self) -> EndTag {
        let open = self.punct("</");
        let name_start = self.pos;
        self.take_name();
        let name = self.push(TokenKind::Word, name_start, self.pos);
        self.skip_ws();
        let close = self.punct(">");
        EndTag { open, name, close }
    }
}

fn flush_text(nodes: &mut Vec<Node>, tokens: &mut Vec<TokenId>) {
    if !tokens.is_empty() {
        nodes.push(Node::Text(TextRun {
            tokens: std::mem::take(tokens),
        }));
    }
}
