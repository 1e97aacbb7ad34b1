use std::fmt;
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fixed-length numeric vector, the payload exchanged through ports.
///
/// The length of a port's value is fixed when the port is created; values
/// written to a port must have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Value(Vec<f64>);

impl Value {
    /// Creates the all-zero value of the specified length.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Returns the elements as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the elements as a mutable slice.
    ///
    /// The length cannot be changed through this view.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }

    /// Returns `true` if all elements are zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|x| *x == 0.0)
    }

    /// Consumes the value and returns the underlying vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for Value {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Value {
    fn from(elements: Vec<f64>) -> Self {
        Self(elements)
    }
}

impl From<&[f64]> for Value {
    fn from(elements: &[f64]) -> Self {
        Self(elements.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(elements: [f64; N]) -> Self {
        Self(elements.to_vec())
    }
}

impl FromIterator<f64> for Value {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, x) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x}")?;
        }
        f.write_str("]")
    }
}
