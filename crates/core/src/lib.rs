//! GraphQL ignored-character stripping (with WASM bindings).
//!
//! This crate removes every character the GraphQL grammar ignores (whitespace, line terminators,
//! commas, comments, the byte order mark) and re-encodes block strings in their shortest form,
//! keeping the document semantically identical. A single space survives only where two tokens
//! would otherwise merge.
//!
//! Entry points:
//!
//! - [`strip`] contains the stripping APIs, with and without sourcemaps.
//! - [`input`] resolves loosely-typed host values into a [`Source`].
//!
//! Internals:
//!
//! - [`lexer`] tokenizes a document and reports [`SyntaxError`]s.
//! - [`token`] defines token kinds and their classes.
//! - [`block_string`] decodes and minimizes block strings.
//! - [`diagnostic`] renders error locations.
//! - [`mapping`] creates and rewrites sourcemaps for the stripped output.
//! - [`source`] holds the document wrapper.
//! - [`utf16`] provides UTF-16 column indexing for diagnostics and sourcemaps.

pub mod block_string;
pub mod diagnostic;
pub mod input;
pub mod lexer;
pub mod mapping;
pub mod source;
pub mod strip;
pub mod token;
pub mod utf16;

pub use diagnostic::{SourceLocation, SyntaxError};
pub use source::{LocationOffset, Source};
pub use strip::{
    CodeAndSourcemap, strip_ignored_characters, strip_ignored_characters_rewrite_sourcemap,
    strip_ignored_characters_with_sourcemap,
};

/// Errors that can occur during stripping.
#[derive(thiserror::Error, Debug)]
pub enum StripError {
    #[error("Must provide string or Source. Received: {received}")]
    InvalidInput { received: String },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(
        "line and column in locationOffset are 1-indexed and must be between 1 and {max}: line={line}, column={column}",
        max = source::MAX_LOCATION_OFFSET
    )]
    InvalidLocationOffset { line: usize, column: usize },

    #[error("invalid sourcemap: {0}")]
    SourceMap(#[from] sourcemap::Error),
}
