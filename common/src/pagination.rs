//! Abstractions for pagination.

use std::{
    fmt,
    iter::{FusedIterator, Peekable},
};

/// A page of items produced by [`Pages`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    /// Number of this [`Page`], starting from `1`.
    pub number: usize,

    /// Items of this [`Page`] in their original order.
    pub items: Vec<T>,

    /// Indicator whether more [`Page`]s follow this one.
    pub has_more: bool,
}

/// Lazy sequence of fixed-size [`Page`]s over an ordered source of items.
///
/// Items are pulled from the source only when the next [`Page`] is requested,
/// so a consumer may stop after any [`Page`]. Every [`Page`], except the last
/// one, contains exactly `size` items.
pub struct Pages<I: Iterator> {
    /// Source of the items.
    items: Peekable<I>,

    /// Maximum number of items in a [`Page`].
    size: usize,

    /// Number of the last produced [`Page`].
    number: usize,
}

impl<I: Iterator> fmt::Debug for Pages<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pages")
            .field("size", &self.size)
            .field("number", &self.number)
            .finish_non_exhaustive()
    }
}

impl<I: Iterator> Pages<I> {
    /// Creates new [`Pages`] over the provided `items`.
    ///
    /// A zero `size` is treated as `1`.
    #[must_use]
    pub fn new(items: impl IntoIterator<IntoIter = I>, size: usize) -> Self {
        Self {
            items: items.into_iter().peekable(),
            size: size.max(1),
            number: 0,
        }
    }

    /// Returns the maximum number of items in a [`Page`].
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.size
    }
}

impl<I: Iterator> Iterator for Pages<I> {
    type Item = Page<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        _ = self.items.peek()?;

        let items = self.items.by_ref().take(self.size).collect::<Vec<_>>();
        self.number += 1;
        Some(Page {
            number: self.number,
            items,
            has_more: self.items.peek().is_some(),
        })
    }
}

impl<I: FusedIterator> FusedIterator for Pages<I> {}

/// Extension for splitting an ordered collection into [`Pages`].
pub trait Paginate: IntoIterator + Sized {
    /// Splits this collection into [`Pages`] of the provided `size`.
    fn paginate(self, size: usize) -> Pages<Self::IntoIter> {
        Pages::new(self, size)
    }
}

impl<T: IntoIterator> Paginate for T {}
