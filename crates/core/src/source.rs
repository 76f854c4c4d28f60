//! Document sources.
//!
//! A [`Source`] is the document text plus the metadata used only for diagnostics: a display
//! name and the position of the body inside a larger file (for documents embedded in host-language
//! files, e.g. a tagged template literal).

use std::{borrow::Cow, num::NonZeroUsize};

use crate::StripError;

/// Name used in diagnostics when the caller does not provide one.
pub const DEFAULT_SOURCE_NAME: &str = "GraphQL request";

/// Largest accepted line or column in a [`LocationOffset`].
///
/// The column pads the first line of every diagnostic, so it has to stay printable.
pub const MAX_LOCATION_OFFSET: usize = 1 << 20;

/// 1-based position where a [`Source`] body begins within its enclosing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOffset {
    pub line: NonZeroUsize,
    pub column: NonZeroUsize,
}

impl LocationOffset {
    /// Build an offset, rejecting zero components and components above
    /// [`MAX_LOCATION_OFFSET`].
    pub fn new(line: usize, column: usize) -> Result<Self, StripError> {
        let checked = |n: usize| NonZeroUsize::new(n).filter(|n| n.get() <= MAX_LOCATION_OFFSET);
        let (Some(line), Some(column)) = (checked(line), checked(column)) else {
            return Err(StripError::InvalidLocationOffset { line, column });
        };
        Ok(Self { line, column })
    }
}

impl Default for LocationOffset {
    fn default() -> Self {
        Self {
            line: NonZeroUsize::MIN,
            column: NonZeroUsize::MIN,
        }
    }
}

/// A document to strip: its text, a name for diagnostics, and its location offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source<'a> {
    body: Cow<'a, str>,
    name: Cow<'a, str>,
    location_offset: LocationOffset,
}

impl<'a> Source<'a> {
    pub fn new(body: impl Into<Cow<'a, str>>) -> Self {
        Self {
            body: body.into(),
            name: Cow::Borrowed(DEFAULT_SOURCE_NAME),
            location_offset: LocationOffset::default(),
        }
    }

    /// Replace the diagnostic name (also recorded as the sourcemap source file).
    pub fn with_name(mut self, name: impl Into<Cow<'a, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_location_offset(mut self, location_offset: LocationOffset) -> Self {
        self.location_offset = location_offset;
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location_offset(&self) -> LocationOffset {
        self.location_offset
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(body: &'a str) -> Self {
        Source::new(body)
    }
}

impl From<String> for Source<'static> {
    fn from(body: String) -> Self {
        Source::new(body)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(body: &'a String) -> Self {
        Source::new(body.as_str())
    }
}

impl<'a, 'b: 'a> From<&'a Source<'b>> for Source<'a> {
    fn from(source: &'a Source<'b>) -> Self {
        Source {
            body: Cow::Borrowed(source.body()),
            name: Cow::Borrowed(source.name()),
            location_offset: source.location_offset,
        }
    }
}
