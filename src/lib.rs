//! Template Indentation Engine
//!
//! A static-analysis engine that verifies and auto-corrects the indentation
//! of hybrid template documents: nested markup, embedded script and style
//! blocks, and templated expressions.
//!
//! This library provides:
//! - An offset graph mapping every token to a symbolic indentation rule
//! - Structural visitors for elements, control blocks, and expressions
//! - A memoized resolver producing expected columns per line
//! - Non-overlapping, idempotent whitespace fixes
//!
//! Parsing stays outside: the engine consumes an already-built token stream
//! and document tree, and hands its findings back as a filterable report.

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod syntax;

// Re-exports for clean public API
pub use config::{IndentConfig, IndentOptions, IndentUnit};
pub use engine::{apply_edits, LineRecord, OffsetGraph, Resolver, TextEdit};
pub use error::EngineError;
pub use report::{check_document, lint_document, IndentReport, ReportItem, ReportKind};
pub use syntax::{Document, Node, Token, TokenId, TokenKind, TokenStream};
