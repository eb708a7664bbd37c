//! Capability trait for table value types.

use num_traits::Zero;
use std::ops::{Add, Div, Mul, Sub};

/// Arithmetic required of a table value type `V` over an argument type `A`.
///
/// Interpolation kernels combine values by addition and subtraction and
/// scale them by argument-typed weights; the spline preparation additionally
/// divides value differences by interval widths and needs a zero element for
/// the natural boundary conditions. This trait states those requirements
/// explicitly instead of leaving them to duck-typed operator availability.
///
/// The trait is blanket-implemented for every type with the listed
/// operators, so `f64` and `f32` (over themselves) qualify without explicit
/// impls, as does any user-defined vector type with the same arithmetic.
///
/// # Examples
/// ```
/// use table_core::traits::TableValue;
///
/// fn lerp<V: TableValue<f64>>(lo: V, hi: V, t: f64) -> V {
///     lo + (hi - lo) * t
/// }
///
/// assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
/// ```
pub trait TableValue<A>:
    Copy
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<A, Output = Self>
    + Div<A, Output = Self>
{
}

impl<A, V> TableValue<A> for V where
    V: Copy + Zero + Add<Output = V> + Sub<Output = V> + Mul<A, Output = V> + Div<A, Output = V>
{
}
