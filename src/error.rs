//! Engine Errors
//!
//! Internal-consistency failures abort a whole analysis pass; a silently
//! skipped inconsistency could corrupt a document through a bad fix. Ordinary
//! indentation mismatches are not errors, they are report items.

use crate::syntax::TokenId;
use thiserror::Error;

/// A failure that invalidates the whole analysis pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An offset chain revisited a token while resolving it.
    #[error("offset resolution cycle at token {token}")]
    OffsetCycle { token: TokenId },

    /// An offset rule referenced a token outside the analyzed stream.
    #[error("offset base {base} is not part of the document")]
    ForeignBase { base: TokenId },
}
