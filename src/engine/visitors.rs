//! Structural Visitors
//!
//! One exhaustive dispatch over the document tree that populates the offset
//! graph. Containers declare rules for their children's first tokens before
//! recursing, so inner visitors overwrite outer ones where they overlap.

use log::debug;

use crate::config::{AttributeExpressionIndent, IndentOptions};
use crate::engine::offsets::OffsetGraph;
use crate::syntax::{
    Attribute, AttributeValue, ClauseTag, ControlBlock, Document, Element, EmbeddedBlock, EndTag,
    MustacheTag, Node, StartTag, TokenId, TokenStream,
};

/// Build the offset graph for a document.
pub fn build_graph(
    doc: &Document,
    stream: &TokenStream<'_>,
    options: &IndentOptions,
) -> OffsetGraph {
    let mut builder = GraphBuilder {
        stream,
        options,
        graph: OffsetGraph::new(stream.len()),
    };
    builder.document(doc);
    debug!(
        "offset graph: {} rules over {} tokens",
        builder.graph.declared(),
        stream.len()
    );
    builder.graph
}

struct GraphBuilder<'a> {
    stream: &'a TokenStream<'a>,
    options: &'a IndentOptions,
    graph: OffsetGraph,
}

impl GraphBuilder<'_> {
    fn document(&mut self, doc: &Document) {
        let Some(first) = self.stream.first_significant() else {
            return;
        };
        for node in &doc.children {
            match node {
                Node::Text(run) => {
                    for &token in &run.tokens {
                        if token != first {
                            self.graph.set_same(token, first);
                        }
                    }
                }
                _ => {
                    if let Some(head) = node.first_token() {
                        if head != first {
                            self.graph.set_same(head, first);
                        }
                    }
                }
            }
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        if self.options.is_ignored(node.kind_name()) {
            // The whole subtree keeps its observed indentation.
            match node {
                Node::Text(run) => {
                    for &token in &run.tokens {
                        self.graph.set_baseline(token);
                    }
                }
                _ => {
                    if let Some(first) = node.first_token() {
                        self.graph.set_baseline(first);
                    }
                }
            }
            return;
        }

        match node {
            Node::Element(el) => self.element(el),
            Node::ControlBlock(block) => self.control_block(block),
            Node::Mustache(tag) => self.mustache(tag),
            Node::Script(block) | Node::Style(block) => self.embedded(block),
            // Text and comments are anchored by their container.
            Node::Text(_) | Node::Comment(_) => {}
        }
    }

    fn children(&mut self, nodes: &[Node], base: TokenId) {
        for node in nodes {
            match node {
                Node::Text(run) => {
                    for &token in &run.tokens {
                        self.graph.set_relative(token, base, 1);
                    }
                }
                _ => {
                    if let Some(first) = node.first_token() {
                        self.graph.set_relative(first, base, 1);
                    }
                }
            }
            self.node(node);
        }
    }

    fn element(&mut self, el: &Element) {
        self.start_tag(&el.start_tag);
        self.children(&el.children, el.start_tag.open);
        if let Some(end_tag) = &el.end_tag {
            self.end_tag(end_tag, el.start_tag.open);
        }
    }

    fn start_tag(&mut self, tag: &StartTag) {
        self.graph.set_relative(tag.name, tag.open, 1);

        let mut first_attr: Option<TokenId> = None;
        for attr in &tag.attributes {
            let head = attr.first_token();
            match first_attr {
                None => {
                    first_attr = Some(head);
                    self.graph.set_relative(head, tag.open, 1);
                }
                Some(anchor) if self.options.align_attributes_vertically => {
                    self.graph.set_align(head, anchor, 0);
                }
                Some(_) => {
                    self.graph.set_relative(head, tag.open, 1);
                }
            }
            self.attribute(attr);
        }

        self.graph.set_same(tag.close, tag.open);
    }

    fn attribute(&mut self, attr: &Attribute) {
        match attr {
            Attribute::Pair(pair) => {
                if let Some(eq) = pair.eq {
                    self.graph.set_relative(eq, pair.name, 1);
                }
                match &pair.value {
                    Some(AttributeValue::Literal(value)) => {
                        self.graph.set_relative(*value, pair.name, 1);
                    }
                    Some(AttributeValue::Mustache(tag)) => {
                        self.graph.set_relative(tag.open, pair.name, 1);
                        self.attribute_expression(tag, pair.name);
                    }
                    None => {}
                }
            }
            Attribute::Shorthand(tag) => {
                // The head `{` is anchored by the attribute loop.
                self.mustache(tag);
            }
        }
    }

    fn attribute_expression(&mut self, tag: &MustacheTag, attr_head: TokenId) {
        match self.options.attribute_expression_indent {
            AttributeExpressionIndent::Expression => self.mustache(tag),
            AttributeExpressionIndent::Attribute => {
                for &token in &tag.expression {
                    self.graph.set_relative(token, attr_head, 1);
                }
                self.graph.set_same(tag.close, tag.open);
            }
        }
    }

    fn mustache(&mut self, tag: &MustacheTag) {
        for &token in &tag.expression {
            self.graph.set_relative(token, tag.open, 1);
        }
        self.graph.set_same(tag.close, tag.open);
    }

    fn control_block(&mut self, block: &ControlBlock) {
        let Some(anchor) = block.clauses.first().map(|clause| clause.tag.open) else {
            return;
        };
        for (index, clause) in block.clauses.iter().enumerate() {
            if index > 0 {
                self.graph.set_same(clause.tag.open, anchor);
            }
            self.clause_tag(&clause.tag);
            self.children(&clause.children, clause.tag.open);
        }
        self.graph.set_same(block.close.open, anchor);
        self.clause_tag(&block.close);
    }

    fn clause_tag(&mut self, tag: &ClauseTag) {
        self.graph.set_relative(tag.keyword, tag.open, 1);
        for &token in &tag.expression {
            self.graph.set_relative(token, tag.open, 1);
        }
        self.graph.set_same(tag.close, tag.open);
    }

    fn embedded(&mut self, block: &EmbeddedBlock) {
        self.start_tag(&block.start_tag);
        if self.options.indent_script_and_style {
            self.embedded_content(&block.content, block.start_tag.open);
        }
        self.end_tag(&block.end_tag, block.start_tag.open);
    }

    /// Re-anchor raw content: the first content line takes one level below
    /// the block tag, every other line keeps its column distance to it. The
    /// block shifts rigidly; its internal structure is not interpreted.
    fn embedded_content(&mut self, content: &[TokenId], open: TokenId) {
        let mut lines = content.iter();
        let Some(&anchor) = lines.next() else {
            return;
        };
        self.graph.set_relative(anchor, open, 1);
        let Some(anchor_column) = self.stream.get(anchor).map(|token| token.column) else {
            return;
        };
        for &token in lines {
            if let Some(column) = self.stream.get(token).map(|token| token.column) {
                let delta = column as i32 - anchor_column as i32;
                self.graph.set_align(token, anchor, delta);
            }
        }
    }

    fn end_tag(&mut self, tag: &EndTag, anchor: TokenId) {
        self.graph.set_same(tag.open, anchor);
        self.graph.set_relative(tag.name, tag.open, 1);
        self.graph.set_relative(tag.close, tag.open, 1);
    }
}
