//! Capability traits for table arguments, values, and consumers.
//!
//! This module defines the abstractions at the seams of the engine:
//! - Generic floating-point arguments (`Float` re-export)
//! - Value-type arithmetic requirements ([`TableValue`])
//! - The single-argument evaluation surface consumed by photon-sampling
//!   code ([`FluxDensity`]) together with its table-backed adapter

/// Generic floating-point trait for table arguments.
///
/// Table arguments require total ordering plus the normal field arithmetic
/// (+, -, *, /); `num_traits::Float` captures exactly that for `f64` and
/// `f32`, so it is re-exported here as the argument bound used throughout
/// the crate.
///
/// # Examples
/// ```
/// use table_core::traits::Float;
///
/// fn midpoint<A: Float>(lo: A, hi: A) -> A {
///     (lo + hi) / A::from(2.0).unwrap()
/// }
///
/// assert_eq!(midpoint(1.0_f64, 3.0), 2.0);
/// ```
pub use num_traits::Float;

pub mod flux;
pub mod value;

pub use flux::{FluxDensity, TabulatedFluxDensity};
pub use value::TableValue;
