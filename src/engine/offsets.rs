//! Offset Graph
//!
//! Maps every token to a symbolic indentation rule relative to a base token.
//! The graph is an arena indexed by `TokenId`, rebuilt per analysis pass and
//! populated outer-to-inner by the structural visitors; declaring a rule for
//! a token that already has one overwrites it, so the most specific visitor
//! wins by traversal order.

use crate::syntax::TokenId;

/// How a token's indentation derives from its base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetKind {
    /// `weight` indentation levels deeper than the base's line
    RelativeIndent,
    /// The same level as the base's line
    SameIndent,
    /// The base's own resolved column plus `weight` columns
    AlignToBase,
    /// Anchored to its own line's observed column
    FirstTokenOfLine,
}

/// One symbolic indentation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetEntry {
    pub base: TokenId,
    pub kind: OffsetKind,
    /// Levels for `RelativeIndent`, columns for `AlignToBase`
    pub weight: i32,
}

/// The per-pass arena of indentation rules
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetGraph {
    entries: Vec<Option<OffsetEntry>>,
}

impl OffsetGraph {
    /// An empty graph sized for a stream of `token_count` tokens.
    pub fn new(token_count: usize) -> Self {
        Self {
            entries: vec![None; token_count],
        }
    }

    /// The rule declared for `target`, if any.
    pub fn get(&self, target: TokenId) -> Option<&OffsetEntry> {
        self.entries.get(target.0)?.as_ref()
    }

    /// Number of tokens the graph was sized for.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of declared rules.
    pub fn declared(&self) -> usize {
        self.entries.iter().filter(|slot| slot.is_some()).count()
    }

    /// Declare a rule for `target`, replacing any previous one. Targets
    /// outside the arena are dropped.
    pub fn declare(&mut self, target: TokenId, entry: OffsetEntry) {
        if let Some(slot) = self.entries.get_mut(target.0) {
            *slot = Some(entry);
        }
    }

    /// `target` sits `levels` levels deeper than `base`'s line.
    pub fn set_relative(&mut self, target: TokenId, base: TokenId, levels: i32) {
        self.declare(
            target,
            OffsetEntry {
                base,
                kind: OffsetKind::RelativeIndent,
                weight: levels,
            },
        );
    }

    /// `target` sits at the same level as `base`'s line.
    pub fn set_same(&mut self, target: TokenId, base: TokenId) {
        self.declare(
            target,
            OffsetEntry {
                base,
                kind: OffsetKind::SameIndent,
                weight: 0,
            },
        );
    }

    /// `target` aligns to `base`'s resolved column plus `columns`.
    pub fn set_align(&mut self, target: TokenId, base: TokenId, columns: i32) {
        self.declare(
            target,
            OffsetEntry {
                base,
                kind: OffsetKind::AlignToBase,
                weight: columns,
            },
        );
    }

    /// `target` keeps its own observed column and terminates chains.
    pub fn set_baseline(&mut self, target: TokenId) {
        self.declare(
            target,
            OffsetEntry {
                base: target,
                kind: OffsetKind::FirstTokenOfLine,
                weight: 0,
            },
        );
    }
}
