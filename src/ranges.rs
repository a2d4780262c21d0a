use std::iter::{FusedIterator, Peekable};
use std::ops::Range;

/// Iterator over the maximal runs of a sequence whose neighbours are equivalent.
///
/// Each run comes out as its index range together with its first element.
/// Every position belongs to exactly one run and runs come out in increasing
/// order. An empty sequence yields nothing.
pub struct Runs<I: Iterator, E> {
    items: Peekable<I>,
    are_equal: E,
    cursor: usize,
}

impl<I, E> Runs<I, E>
where
    I: Iterator,
    I::Item: Clone,
    E: FnMut(&I::Item, &I::Item) -> bool,
{
    pub fn new(items: impl IntoIterator<IntoIter = I>, are_equal: E) -> Self {
        Self {
            items: items.into_iter().peekable(),
            are_equal,
            cursor: 0,
        }
    }
}

impl<I, E> Iterator for Runs<I, E>
where
    I: Iterator,
    I::Item: Clone,
    E: FnMut(&I::Item, &I::Item) -> bool,
{
    type Item = (Range<usize>, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.items.next()?;
        let start = self.cursor;
        let mut end = start + 1;
        let mut previous = first.clone();
        while let Some(item) = self
            .items
            .next_if(|next| (self.are_equal)(&previous, next))
        {
            previous = item;
            end += 1;
        }
        self.cursor = end;
        Some((start..end, first))
    }
}

impl<I, E> FusedIterator for Runs<I, E>
where
    I: Iterator,
    I::Item: Clone,
    E: FnMut(&I::Item, &I::Item) -> bool,
{
}

pub fn runs<T, E>(items: T, are_equal: E) -> Runs<T::IntoIter, E>
where
    T: IntoIterator,
    T::Item: Clone,
    E: FnMut(&T::Item, &T::Item) -> bool,
{
    Runs::new(items, are_equal)
}

/// Reports the maximal runs of `items` that `filter` accepts.
///
/// Adjacent elements belong to the same run while `are_equal` holds for them.
/// A run is judged by its first element, since all of its members are
/// equivalent. `found` receives half-open `(start, end)` bounds in order.
pub fn find_ranges<T, E, F, R>(items: T, are_equal: E, mut filter: F, mut found: R)
where
    T: IntoIterator,
    T::Item: Clone,
    E: FnMut(&T::Item, &T::Item) -> bool,
    F: FnMut(&T::Item) -> bool,
    R: FnMut(usize, usize),
{
    for (range, first) in runs(items, are_equal) {
        if filter(&first) {
            found(range.start, range.end);
        }
    }
}

#[cfg(test)]
#[path = "ranges_tests.rs"]
mod ranges_tests;
