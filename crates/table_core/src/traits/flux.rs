//! Flux-density capability and its table-backed adapter.

use std::io::BufRead;

use crate::table::{Interpolant, Table};
use crate::types::TableError;

/// A radial flux density f(x) evaluable at a single argument.
///
/// Photon-sampling consumers draw positions from a profile through this
/// surface; they only ever need pointwise evaluation, so the trait is a
/// single method. Implementations must be total over `f64`: out-of-domain
/// arguments yield zero flux rather than an error.
pub trait FluxDensity {
    /// Evaluate the flux density at `x`.
    fn flux_density(&self, x: f64) -> f64;
}

/// A [`FluxDensity`] backed by a sampled [`Table<f64, f64>`].
///
/// The adapter owns the table and delegates evaluation to its lenient call
/// path, so arguments outside the sampled domain return zero flux. This is
/// composition rather than inheritance: callers needing the full table
/// surface (bounds, bulk evaluation, introspection) reach it through
/// [`table`](TabulatedFluxDensity::table).
///
/// # Examples
/// ```
/// use table_core::table::Interpolant;
/// use table_core::traits::{FluxDensity, TabulatedFluxDensity};
///
/// let radii = [0.0, 1.0, 2.0];
/// let flux = [1.0, 0.5, 0.0];
///
/// let density =
///     TabulatedFluxDensity::from_slices(&radii, &flux, Interpolant::Linear).unwrap();
/// assert!((density.flux_density(0.5) - 0.75).abs() < 1e-12);
/// assert_eq!(density.flux_density(10.0), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct TabulatedFluxDensity {
    table: Table<f64, f64>,
}

impl TabulatedFluxDensity {
    /// Create an empty adapter; fill it through [`table_mut`](Self::table_mut).
    pub fn new(interpolant: Interpolant) -> Self {
        Self {
            table: Table::new(interpolant),
        }
    }

    /// Build from parallel argument/value slices.
    ///
    /// # Errors
    ///
    /// Propagates the wrapped table's construction errors (mismatched
    /// lengths, fewer than 2 points, duplicate arguments).
    pub fn from_slices(
        args: &[f64],
        vals: &[f64],
        interpolant: Interpolant,
    ) -> Result<Self, TableError> {
        Ok(Self {
            table: Table::from_slices(args, vals, interpolant)?,
        })
    }

    /// Build from a stream of whitespace-separated (argument, value) pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ReadError`] for a malformed line.
    pub fn from_reader<R: BufRead>(reader: R, interpolant: Interpolant) -> Result<Self, TableError> {
        Ok(Self {
            table: Table::from_reader(reader, interpolant)?,
        })
    }

    /// The wrapped table.
    #[inline]
    pub fn table(&self) -> &Table<f64, f64> {
        &self.table
    }

    /// Mutable access to the wrapped table, for incremental construction.
    #[inline]
    pub fn table_mut(&mut self) -> &mut Table<f64, f64> {
        &mut self.table
    }
}

impl FluxDensity for TabulatedFluxDensity {
    /// Evaluate by delegating to the table's lenient call path.
    fn flux_density(&self, x: f64) -> f64 {
        self.table.eval(x)
    }
}
