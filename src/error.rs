//! Crate-wide error type.
//!
//! Recoverable failures (bad description text, terminal I/O, unknown widget
//! names) surface as [`Error`] values. Internal tree-invariant violations are
//! panics instead, since they indicate a bug rather than bad input.

use std::io;

/// Errors returned by the public form API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The description text could not be parsed.
    #[error("parse error at line {line}: {message} (near {excerpt:?})")]
    Parse {
        line: usize,
        message: String,
        excerpt: String,
    },

    /// A widget or kv name that an operation requires does not exist.
    #[error("unknown name: {0:?}")]
    UnknownName(String),

    /// An unrecognized mode string was passed to `modify`.
    #[error("unknown modify mode: {0:?}")]
    UnknownMode(String),

    /// An include directive referenced a file that could not be read.
    #[error("cannot include {path:?}")]
    Include {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Terminal I/O failed.
    #[error("terminal i/o error")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a parse error with a trimmed excerpt of the offending line.
    pub(crate) fn parse(line: usize, message: impl Into<String>, excerpt: &str) -> Self {
        let excerpt = excerpt.trim();
        let excerpt = if excerpt.len() > 40 {
            let mut end = 40;
            while !excerpt.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &excerpt[..end])
        } else {
            excerpt.to_string()
        };
        Error::Parse { line, message: message.into(), excerpt }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
