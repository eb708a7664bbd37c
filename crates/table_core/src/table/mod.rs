//! Lookup tables for sampled functions y = f(x) and z = f(x, y).
//!
//! ## Available Tables
//!
//! - [`Table`]: 1-D sorted (argument, value) sequence with linear, natural
//!   cubic spline, floor, and ceil interpolation
//! - [`Table2D`]: dense rectangular grid with bilinear, floor, ceil, and
//!   nearest interpolation
//! - [`ArgGrid`]: one sorted argument axis, shared by both axes of a
//!   [`Table2D`]
//!
//! ## Bracketing Strategy
//!
//! Every lookup resolves a bracketing index with the same three-tier
//! strategy: an O(1) formula when the arguments are detected to be equally
//! spaced, otherwise a check of the index cached from the previous query and
//! its immediate neighbours, otherwise binary search. Queries within a small
//! slop band beyond the sampled domain are treated as boundary hits to
//! absorb floating-point round-off.
//!
//! ## Thread Safety
//!
//! The bracketing caches (and the 1-D table's lazy sort/spline preparation)
//! live behind `Cell`/`RefCell`, so these types are not `Sync`. Share a
//! table across workers by cloning it per worker or locking externally.

mod grid;
mod one_dim;
mod two_dim;

pub use grid::ArgGrid;
pub use one_dim::{Entry, Interpolant, Table};
pub use two_dim::{Interpolant2d, Table2D};

/// Tolerance, in units of the mean gap, for classifying arguments as
/// equally spaced.
pub(crate) const EQUAL_SPACING_TOL: f64 = 0.1;

/// Fraction of the boundary gap accepted outside the sampled domain.
pub(crate) const SLOP_FRACTION: f64 = 1.0e-6;
