//! Indentation Engine
//!
//! The analysis pipeline, leaf-first: token classification, the offset
//! graph, the structural visitors that populate it, the resolver that turns
//! offset chains into per-line expectations, and the fix emitter.

pub mod classify;
pub mod fixes;
pub mod offsets;
pub mod resolver;
pub mod visitors;

pub use classify::{classify, next_significant, prev_significant, TokenClass};
pub use fixes::{apply_edits, edit_for, mismatch_for, Mismatch, TextEdit};
pub use offsets::{OffsetEntry, OffsetGraph, OffsetKind};
pub use resolver::{LineRecord, Resolver};
pub use visitors::build_graph;
