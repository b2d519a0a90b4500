use thiserror::Error;

/// Errors returned while compiling or matching wildcard patterns.
#[derive(Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The pattern opened a character class with `[` that is never closed
    /// by an unescaped `]`.
    #[error("invalid wildcard pattern `{pattern}`: character class opened at offset {offset} is never closed")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Byte offset of the `[` that opened the unterminated class.
        offset: usize,
    },

    /// A [`CompiledPattern`](crate::CompiledPattern) was used after being
    /// released.
    #[error("compiled pattern used after release")]
    UseAfterRelease,
}
