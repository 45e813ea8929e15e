//! Core type definitions for dispatch resolution.

use std::fmt;

/// The declared parameter types of one registered implementation.
///
/// Two signatures are equal iff they have the same length and identical
/// types at every position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature<T> {
    types: Vec<T>,
}

impl<T> Signature<T> {
    pub fn new(types: Vec<T>) -> Self {
        Self { types }
    }

    /// Number of positions.
    pub fn arity(&self) -> usize {
        self.types.len()
    }

    pub fn types(&self) -> &[T] {
        &self.types
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.types.iter()
    }

    pub fn into_types(self) -> Vec<T> {
        self.types
    }

    /// Display the signature as `(A, B)`, naming each type with `namer`.
    pub fn display_with<F>(&self, namer: F) -> SignatureDisplay<'_, T, F>
    where
        F: Fn(&T) -> String,
    {
        SignatureDisplay {
            types: &self.types,
            namer,
        }
    }
}

impl<T> From<Vec<T>> for Signature<T> {
    fn from(types: Vec<T>) -> Self {
        Self::new(types)
    }
}

impl<T, const N: usize> From<[T; N]> for Signature<T> {
    fn from(types: [T; N]) -> Self {
        Self::new(types.into())
    }
}

impl<T: Clone> From<&[T]> for Signature<T> {
    fn from(types: &[T]) -> Self {
        Self::new(types.to_vec())
    }
}

impl<T> FromIterator<T> for Signature<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> AsRef<[T]> for Signature<T> {
    fn as_ref(&self) -> &[T] {
        &self.types
    }
}

impl<'a, T> IntoIterator for &'a Signature<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

impl<T: fmt::Debug> fmt::Display for Signature<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.types, |t| format!("{t:?}"))
    }
}

/// Renders a signature with caller-chosen type names.
pub struct SignatureDisplay<'a, T, F> {
    types: &'a [T],
    namer: F,
}

impl<T, F> fmt::Display for SignatureDisplay<'_, T, F>
where
    F: Fn(&T) -> String,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, self.types, &self.namer)
    }
}

pub(crate) fn write_tuple<T>(
    f: &mut fmt::Formatter<'_>,
    types: &[T],
    namer: impl Fn(&T) -> String,
) -> fmt::Result {
    write!(f, "(")?;
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", namer(ty))?;
    }
    write!(f, ")")
}
