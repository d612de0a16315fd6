//! Document tree for analyzed templates.
//!
//! Clean, minimal types representing the parsed structure of a hybrid
//! document: nested markup, control blocks, templated expressions, and
//! embedded script/style blocks. Nodes hold `TokenId`s only; the token data
//! itself lives in the `TokenStream`.

use crate::syntax::token::TokenId;

/// A whole parsed document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

/// Any node that can appear in document content
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    ControlBlock(ControlBlock),
    Mustache(MustacheTag),
    Script(EmbeddedBlock),
    Style(EmbeddedBlock),
    Text(TextRun),
    Comment(CommentNode),
}

impl Node {
    /// The first token of the node, used to anchor it to its container.
    pub fn first_token(&self) -> Option<TokenId> {
        match self {
            Node::Element(el) => Some(el.start_tag.open),
            Node::ControlBlock(block) => block.clauses.first().map(|c| c.tag.open),
            Node::Mustache(tag) => Some(tag.open),
            Node::Script(block) | Node::Style(block) => Some(block.start_tag.open),
            Node::Text(run) => run.tokens.first().copied(),
            Node::Comment(comment) => Some(comment.token),
        }
    }

    /// The node kind name used in configuration (`ignored_nodes`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Element(_) => "element",
            Node::ControlBlock(_) => "control-block",
            Node::Mustache(_) => "mustache-tag",
            Node::Script(_) => "script",
            Node::Style(_) => "style",
            Node::Text(_) => "text",
            Node::Comment(_) => "comment",
        }
    }
}

/// All node kind names accepted by `ignored_nodes`.
pub const NODE_KIND_NAMES: [&str; 7] = [
    "element",
    "control-block",
    "mustache-tag",
    "script",
    "style",
    "text",
    "comment",
];

/// A markup element with optional children and end tag
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub start_tag: StartTag,
    pub children: Vec<Node>,
    /// Missing for void and self-closing elements
    pub end_tag: Option<EndTag>,
}

/// The opening tag of an element: `<name attr ... >` or `<name ... />`
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag {
    /// The `<` token
    pub open: TokenId,
    pub name: TokenId,
    pub attributes: Vec<Attribute>,
    /// The `>` or `/>` token
    pub close: TokenId,
}

/// The closing tag of an element: `</name>`
#[derive(Debug, Clone, PartialEq)]
pub struct EndTag {
    /// The `</` token
    pub open: TokenId,
    pub name: TokenId,
    /// The `>` token
    pub close: TokenId,
}

/// An attribute inside a start tag
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// `name`, `name="value"`, or `name={expr}`
    Pair(AttributePair),
    /// A bare `{expr}` shorthand attribute
    Shorthand(MustacheTag),
}

impl Attribute {
    pub fn first_token(&self) -> TokenId {
        match self {
            Attribute::Pair(pair) => pair.name,
            Attribute::Shorthand(tag) => tag.open,
        }
    }
}

/// A named attribute, possibly with a value
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePair {
    pub name: TokenId,
    /// The `=` token, when a value is present
    pub eq: Option<TokenId>,
    pub value: Option<AttributeValue>,
}

/// An attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// A quoted literal, one token including the quotes
    Literal(TokenId),
    /// A templated `{expr}` value
    Mustache(MustacheTag),
}

/// A templated expression: `{` expression tokens `}`
#[derive(Debug, Clone, PartialEq)]
pub struct MustacheTag {
    /// The `{` token
    pub open: TokenId,
    pub expression: Vec<TokenId>,
    /// The `}` token
    pub close: TokenId,
}

/// A control block: `{#if ...}`, clauses, `{/if}` and friends
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBlock {
    pub kind: ControlKind,
    /// The opening clause plus any `{:...}` branches, in source order
    pub clauses: Vec<Clause>,
    /// The `{/...}` tag
    pub close: ClauseTag,
}

/// The kind of a control block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    If,
    Each,
    Await,
    Key,
}

/// One branch of a control block: its tag and the children under it
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub tag: ClauseTag,
    pub children: Vec<Node>,
}

/// A control tag: `{#kw expr}`, `{:kw expr}`, or `{/kw}`
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseTag {
    /// The `{#`, `{:`, or `{/` token
    pub open: TokenId,
    pub keyword: TokenId,
    pub expression: Vec<TokenId>,
    /// The `}` token
    pub close: TokenId,
}

/// A `<script>` or `<style>` block with raw embedded content
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedBlock {
    pub start_tag: StartTag,
    /// One raw token per content line, in source order
    pub content: Vec<TokenId>,
    pub end_tag: EndTag,
}

/// A run of character data, one token per physical line
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub tokens: Vec<TokenId>,
}

/// A `<!-- -->` comment, one token
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub token: TokenId,
}
