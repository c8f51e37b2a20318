use thiserror::Error;

/// Errors reported by the public operations of a [`SuffixTree`](crate::SuffixTree).
///
/// Broken internal bookkeeping (a missing suffix link, a child that should
/// exist but does not) is not represented here; those are bugs and panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuffixTreeError {
    #[error("terminator 0x{terminator:02x} occurs in the input at offset {offset}")]
    TerminatorInText { terminator: u8, offset: usize },

    #[error("the suffix tree must be built before it can be queried")]
    NotBuilt,

    #[error("the suffix tree has already been built")]
    AlreadyBuilt,
}

pub type Result<T> = std::result::Result<T, SuffixTreeError>;
