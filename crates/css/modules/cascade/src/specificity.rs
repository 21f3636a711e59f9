//! Selector specificity as supplied by the selector matcher.
//! Spec: <https://www.w3.org/TR/selectors-4/#specificity-rules>

use core::fmt::{self, Display, Formatter};
use core::ops::Add;
use serde::{Deserialize, Serialize};

/// Specificity triple (a, b, c): ids, classes/attributes/pseudo-classes,
/// types/pseudo-elements. Ordering is lexicographic with `a` weighted highest.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Specificity(pub u16, pub u16, pub u16);

impl Specificity {
    /// Specificity of the universal selector and of style attributes.
    pub const ZERO: Self = Self(0, 0, 0);

    #[inline]
    pub const fn new(ids: u16, classes: u16, types: u16) -> Self {
        Self(ids, classes, types)
    }
}

/// Component-wise saturating sum, as when accumulating compound selectors.
impl Add for Specificity {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(
            self.0.saturating_add(rhs.0),
            self.1.saturating_add(rhs.1),
            self.2.saturating_add(rhs.2),
        )
    }
}

impl Display for Specificity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "({},{},{})", self.0, self.1, self.2)
    }
}
