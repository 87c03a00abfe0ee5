//! Iterators over [`Collection`](crate::Collection) and
//! [`DataSet`](crate::DataSet).
//!
//! Iteration yields `(key, value)` pairs in stored order. Every call to
//! `iter()` starts a fresh pass.

use std::iter::FusedIterator;

use crate::Key;

/// A borrowing iterator over `(&Key, &T)` pairs.
pub struct Iter<'a, T> {
    inner: indexmap::map::Iter<'a, Key, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) const fn new(inner: indexmap::map::Iter<'a, Key, T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Key, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// An owning iterator over `(Key, T)` pairs.
pub struct IntoIter<T> {
    inner: indexmap::map::IntoIter<Key, T>,
}

impl<T> IntoIter<T> {
    pub(crate) const fn new(inner: indexmap::map::IntoIter<Key, T>) -> Self {
        Self { inner }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = (Key, T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
