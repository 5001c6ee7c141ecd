//! Case-insensitive substring search over transcript segments.

use std::iter::FusedIterator;
use std::slice;

use crate::segments::Segment;

/// Lazily filter `segments` down to those whose text contains `query`, ignoring case.
///
/// An empty query matches every segment. Matches come back in their original order.
pub fn search<'a>(segments: &'a [Segment], query: &str) -> Matches<'a> {
    let needle = (!query.is_empty()).then(|| query.to_lowercase());
    Matches {
        inner: segments.iter(),
        needle,
    }
}

/// Iterator returned by [`search`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    inner: slice::Iter<'a, Segment>,

    /// Lowercased query, or `None` to pass everything through.
    needle: Option<String>,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        match self.needle.as_deref() {
            None => self.inner.next(),
            Some(needle) => self
                .inner
                .find(|seg| seg.text.to_lowercase().contains(needle)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.needle {
            None => self.inner.size_hint(),
            Some(_) => (0, self.inner.size_hint().1),
        }
    }
}

impl FusedIterator for Matches<'_> {}
