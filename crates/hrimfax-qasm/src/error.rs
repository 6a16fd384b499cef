//! Error types for qasm reading.

use thiserror::Error;

/// Errors raised while parsing qasm text.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum QasmError {
    /// A character sequence no token matches.
    #[error("line {line}: unrecognized input '{text}'")]
    Lex {
        /// 1-based source line.
        line: usize,
        /// The offending slice.
        text: String,
    },

    /// A token other than the expected one.
    #[error("line {line}: expected {expected}, found {found}")]
    Unexpected {
        /// 1-based source line.
        line: usize,
        /// What the grammar needed.
        expected: &'static str,
        /// What was there.
        found: String,
    },

    /// Input ended inside a construct.
    #[error("unexpected end of input: expected {0}")]
    Eof(&'static str),

    /// A version other than 1.0.
    #[error("unsupported qasm version '{0}'")]
    Version(String),

    /// A gate statement outside any kernel section.
    #[error("line {0}: statement before the first kernel section")]
    NoSection(usize),
}

/// Result alias for qasm operations.
pub type QasmResult<T> = Result<T, QasmError>;
