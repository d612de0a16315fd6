//! Indentation Resolver
//!
//! Resolves offset chains to expected columns and walks the document line by
//! line, yielding one record per checkable line. Resolution is lazy and
//! memoized; each token is resolved at most once per pass. The resolver is a
//! single-pass iterator: once it yields an error the pass is over.

use log::debug;

use crate::config::IndentOptions;
use crate::engine::classify;
use crate::engine::offsets::{OffsetGraph, OffsetKind};
use crate::error::EngineError;
use crate::syntax::{TokenId, TokenStream};

/// Expected vs observed indentation of one checkable line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    pub line: usize,
    pub first_token: TokenId,
    pub expected_column: usize,
    pub actual_column: usize,
}

/// Closing delimiters that may dangle after a single-line construct
const CLOSERS: [&str; 5] = [">", "/>", "}", "{/", "</"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum ResolveState {
    Unresolved,
    InProgress,
    Done(usize),
}

/// Lazy iterator over the checkable lines of one analysis pass
#[derive(Debug)]
pub struct Resolver<'a> {
    stream: &'a TokenStream<'a>,
    graph: &'a OffsetGraph,
    options: &'a IndentOptions,
    memo: Vec<ResolveState>,
    line: usize,
    failed: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(
        stream: &'a TokenStream<'a>,
        graph: &'a OffsetGraph,
        options: &'a IndentOptions,
    ) -> Self {
        debug!(
            "resolving {} line(s) against {} rule(s)",
            stream.line_count(),
            graph.declared()
        );
        Self {
            stream,
            graph,
            options,
            memo: vec![ResolveState::Unresolved; stream.len()],
            line: 1,
            failed: false,
        }
    }

    /// Expected column of `target` once all fixes apply.
    fn resolve(&mut self, target: TokenId) -> Result<usize, EngineError> {
        let (line, column) = match self.stream.get(target) {
            Some(token) => (token.line, token.column),
            None => return Err(EngineError::ForeignBase { base: target }),
        };

        match self.memo[target.0] {
            ResolveState::Done(resolved) => return Ok(resolved),
            ResolveState::InProgress => return Err(EngineError::OffsetCycle { token: target }),
            ResolveState::Unresolved => {}
        }
        self.memo[target.0] = ResolveState::InProgress;

        let head = self.stream.line_head(line);
        let value: isize = if head != Some(target) {
            // Mid-line tokens ride their line, keeping intra-line distance;
            // a leading-whitespace fix shifts the whole line by one delta.
            match head {
                Some(head) => {
                    let head_column = self
                        .stream
                        .get(head)
                        .map(|token| token.column)
                        .unwrap_or(column);
                    self.resolve(head)? as isize + column as isize - head_column as isize
                }
                None => column as isize,
            }
        } else {
            match self.graph.get(target).copied() {
                None => {
                    if self.stream.first_significant() == Some(target) {
                        0
                    } else {
                        // Unanchored lines are trusted and serve as baselines.
                        column as isize
                    }
                }
                Some(entry) => match entry.kind {
                    OffsetKind::RelativeIndent => {
                        self.level(entry.base)? as isize
                            + entry.weight as isize * self.options.unit.width() as isize
                    }
                    OffsetKind::SameIndent => self.level(entry.base)? as isize,
                    OffsetKind::AlignToBase => {
                        self.resolve(entry.base)? as isize + entry.weight as isize
                    }
                    OffsetKind::FirstTokenOfLine => column as isize,
                },
            }
        };

        let resolved = value.max(0) as usize;
        self.memo[target.0] = ResolveState::Done(resolved);
        Ok(resolved)
    }

    /// Indentation level of `base`'s line: the resolved column of its head.
    fn level(&mut self, base: TokenId) -> Result<usize, EngineError> {
        let line = match self.stream.get(base) {
            Some(token) => token.line,
            None => return Err(EngineError::ForeignBase { base }),
        };
        match self.stream.line_head(line) {
            Some(head) => self.resolve(head),
            None => self.resolve(base),
        }
    }

    /// A line-first closer dangling after a construct otherwise written on
    /// one line imposes no rule.
    fn is_exempt_closer(&self, head: TokenId) -> bool {
        let Some(entry) = self.graph.get(head) else {
            return false;
        };
        if entry.kind != OffsetKind::SameIndent {
            return false;
        }
        let Some(token) = self.stream.get(head) else {
            return false;
        };
        if !CLOSERS.contains(&token.text.as_str()) {
            return false;
        }
        let Some(base) = self.stream.get(entry.base) else {
            return false;
        };
        let Some(prev) = classify::prev_significant(self.stream, head) else {
            return false;
        };
        self.stream
            .get(prev)
            .map(|token| token.line == base.line)
            .unwrap_or(false)
    }
}

impl Iterator for Resolver<'_> {
    type Item = Result<LineRecord, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.line <= self.stream.line_count() {
            let line = self.line;
            self.line += 1;

            // Blank, whitespace-only, and covered lines have no head.
            let Some(head) = self.stream.line_head(line) else {
                continue;
            };
            let Some(token) = self.stream.get(head) else {
                continue;
            };
            let actual_column = token.column;

            let anchored = self.graph.get(head).is_some();
            let is_document_first = self.stream.first_significant() == Some(head);
            if !anchored && !is_document_first {
                continue;
            }
            if self.is_exempt_closer(head) {
                continue;
            }

            let item = self.resolve(head).map(|expected_column| LineRecord {
                line,
                first_token: head,
                expected_column,
                actual_column,
            });
            if item.is_err() {
                self.failed = true;
            }
            return Some(item);
        }
        None
    }
}
