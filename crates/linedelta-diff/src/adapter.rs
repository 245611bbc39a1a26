//! Sequence comparator adapter.
//!
//! The differencing algorithm only needs a length and positional equality.
//! [`SequenceAdapter`] provides both over raw lines, filtered tokens, or any
//! other comparable elements, and implements `Index<usize>` so it can be
//! handed directly to `similar`'s algorithms.

use std::ops::Index;

use crate::filter::FilteredSequence;

/// A possibly-absent element of a compared sequence.
///
/// Two present elements are equal when they are the same object or compare
/// equal by value. An absent element is unequal to everything, including
/// another absent element.
#[derive(Debug)]
pub struct Element<'a, T: ?Sized>(Option<&'a T>);

impl<'a, T: ?Sized> Element<'a, T> {
    pub fn new(value: Option<&'a T>) -> Self {
        Self(value)
    }

    pub fn get(&self) -> Option<&'a T> {
        self.0
    }
}

impl<T: ?Sized> Clone for Element<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Element<'_, T> {}

impl<'b, T: PartialEq + ?Sized> PartialEq<Element<'b, T>> for Element<'_, T> {
    fn eq(&self, other: &Element<'b, T>) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => std::ptr::eq(a, b) || a == b,
            _ => false,
        }
    }
}

/// Positional view over one side of a comparison.
#[derive(Debug)]
pub struct SequenceAdapter<'a, T: ?Sized> {
    elements: Vec<Element<'a, T>>,
}

impl<'a, T: PartialEq + ?Sized> SequenceAdapter<'a, T> {
    /// Wrap a sequence of possibly-absent elements.
    pub fn new(elements: impl IntoIterator<Item = Option<&'a T>>) -> Self {
        Self {
            elements: elements.into_iter().map(Element::new).collect(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Compare element `i` of this sequence with element `j` of `other`.
    ///
    /// Out-of-range positions compare unequal.
    pub fn elements_equal(&self, i: usize, other: &SequenceAdapter<'_, T>, j: usize) -> bool {
        match (self.elements.get(i), other.elements.get(j)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> SequenceAdapter<'a, str> {
    /// Compare raw lines verbatim.
    pub fn from_lines<S: AsRef<str>>(lines: &'a [S]) -> Self {
        Self::new(lines.iter().map(|l| Some(l.as_ref())))
    }

    /// Compare the normalized keys of a filtered sequence.
    pub fn from_filtered(seq: &'a FilteredSequence) -> Self {
        Self::new(seq.texts().map(Some))
    }
}

impl<'a, T: ?Sized> Index<usize> for SequenceAdapter<'a, T> {
    type Output = Element<'a, T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}
