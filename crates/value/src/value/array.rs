//! Rectangular N-dimensional arrays
//!
//! [`Array`] stores its elements flat in row-major order next to the extent of
//! every dimension. The shape is fixed at construction and there are no
//! mutating methods; transformations build a new array with the same shape.
//! Elements sit behind an `Arc`, so cloning an array never copies them.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{ValueError, ValueResult};

/// Extents of an array, outermost dimension first
pub type Shape = SmallVec<[usize; 4]>;

/// Immutable, row-major, N-dimensional array (N >= 1)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Array<T> {
    shape: Shape,
    elements: Arc<[T]>,
}

impl<T> Array<T> {
    /// Create a one-dimensional array
    pub fn from_vec(elements: Vec<T>) -> Self {
        let mut shape = Shape::new();
        shape.push(elements.len());
        Self {
            shape,
            elements: elements.into(),
        }
    }

    /// Create an empty one-dimensional array
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create an array of the given shape from row-major elements
    ///
    /// Fails with [`ValueError::InvalidArgument`] when the shape has no
    /// dimensions, when its extents overflow, or when their product differs
    /// from the number of elements.
    pub fn from_shape(shape: &[usize], elements: Vec<T>) -> ValueResult<Self> {
        let expected = element_count(shape)?;
        if expected != elements.len() {
            return Err(ValueError::invalid_argument(format!(
                "shape {shape:?} holds {expected} elements, got {}",
                elements.len()
            )));
        }

        Ok(Self {
            shape: Shape::from_slice(shape),
            elements: elements.into(),
        })
    }

    /// Create an array of the given shape with every element set to `value`
    pub fn filled(shape: &[usize], value: T) -> ValueResult<Self>
    where
        T: Clone,
    {
        let count = element_count(shape)?;
        Self::from_shape(shape, vec![value; count])
    }

    /// Extent of every dimension
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions (always at least 1)
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.shape.len()
    }

    /// Total element count
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the array holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at a multi-dimensional coordinate
    pub fn get(&self, coordinate: &[usize]) -> Option<&T> {
        self.flat_index(coordinate)
            .and_then(|index| self.elements.get(index))
    }

    /// Row-major flat index of a coordinate, if it is in range
    pub fn flat_index(&self, coordinate: &[usize]) -> Option<usize> {
        if coordinate.len() != self.shape.len() {
            return None;
        }

        let mut index = 0usize;
        for (&position, &extent) in coordinate.iter().zip(self.shape.iter()) {
            if position >= extent {
                return None;
            }
            index = index * extent + position;
        }
        Some(index)
    }

    /// Multi-dimensional coordinate of a flat row-major index
    pub fn coordinate_of(&self, flat: usize) -> Option<Shape> {
        if flat >= self.len() {
            return None;
        }

        let mut coordinate = Shape::from_elem(0, self.shape.len());
        let mut remaining = flat;
        for (slot, &extent) in coordinate.iter_mut().zip(self.shape.iter()).rev() {
            *slot = remaining % extent;
            remaining /= extent;
        }
        Some(coordinate)
    }

    /// Iterate over elements in row-major order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Elements in row-major order
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Apply `f` to every element, preserving the shape
    pub fn map<U, F>(&self, f: F) -> Array<U>
    where
        F: FnMut(&T) -> U,
    {
        Array {
            shape: self.shape.clone(),
            elements: self.elements.iter().map(f).collect(),
        }
    }

    /// Apply a fallible `f` to every element, preserving the shape
    ///
    /// Stops at the first failure and reports it wrapped in
    /// [`ValueError::ArrayElement`] with the element's flat index.
    pub fn try_map<U, F>(&self, mut f: F) -> ValueResult<Array<U>>
    where
        F: FnMut(&T) -> ValueResult<U>,
    {
        let elements = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| f(element).map_err(|e| ValueError::at_element(index, e)))
            .collect::<ValueResult<Vec<U>>>()?;

        Ok(Array {
            shape: self.shape.clone(),
            elements: elements.into(),
        })
    }
}

/// Product of the extents, rejecting zero-dimension shapes and overflow
pub(crate) fn element_count(shape: &[usize]) -> ValueResult<usize> {
    if shape.is_empty() {
        return Err(ValueError::invalid_argument(
            "array shape needs at least one dimension",
        ));
    }

    shape.iter().try_fold(1usize, |acc, &extent| {
        acc.checked_mul(extent).ok_or_else(|| {
            ValueError::invalid_argument(format!("array shape {shape:?} overflows"))
        })
    })
}

impl<T: PartialOrd> PartialOrd for Array<T> {
    /// Arrays of different shapes are unordered; equal shapes compare
    /// lexicographically in row-major order.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.shape != other.shape {
            return None;
        }
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("shape", &self.shape.as_slice())
            .field("elements", &self.as_slice())
            .finish()
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_vec(elements)
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
