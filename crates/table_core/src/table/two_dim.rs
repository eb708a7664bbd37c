//! Two-dimensional lookup table over a dense rectangular grid.

use num_traits::Float;

use super::ArgGrid;
use crate::traits::TableValue;
use crate::types::TableError;

/// Interpolation strategy for a [`Table2D`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolant2d {
    /// Bilinear blend of the four corner values of the bracketing cell.
    Linear,
    /// Corner at or below the query on each axis independently.
    Floor,
    /// Corner at or above the query on each axis independently.
    Ceil,
    /// The bracketing grid point nearest to the query; on an exact midpoint
    /// tie the upper index wins on that axis.
    Nearest,
}

/// A lookup table for a sampled function z = f(x, y).
///
/// Owns one [`ArgGrid`] per axis and a dense x-major value array of length
/// `nx * ny`, where `vals[i * ny + j]` is the sample at
/// `(x_args[i], y_args[j])`. The table is immutable after construction;
/// only the per-axis bracketing caches mutate on queries, so the type is
/// not `Sync` (clone per worker or lock externally).
///
/// # Type Parameters
///
/// * `A` - Argument type ([`Float`])
/// * `V` - Value type ([`TableValue`])
///
/// # Example
///
/// ```
/// use table_core::table::{Interpolant2d, Table2D};
///
/// let xs = [0.0f64, 1.0];
/// let ys = [0.0f64, 1.0, 2.0];
/// // z = x + y, x-major layout
/// let vals = [0.0f64, 1.0, 2.0, 1.0, 2.0, 3.0];
///
/// let table = Table2D::new(&xs, &ys, &vals, Interpolant2d::Linear).unwrap();
/// let z = table.lookup(0.5, 1.5).unwrap();
/// assert!((z - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Table2D<A: Float, V: TableValue<A>> {
    interpolant: Interpolant2d,
    xgrid: ArgGrid<A>,
    ygrid: ArgGrid<A>,
    ny: usize,
    vals: Vec<V>,
}

impl<A: Float, V: TableValue<A>> Table2D<A, V> {
    /// Construct from two argument axes and a dense x-major value array.
    ///
    /// # Errors
    ///
    /// * [`TableError::InsufficientData`] - an axis has fewer than 2 points
    /// * [`TableError::NonMonotonic`] - an axis is not strictly increasing
    /// * [`TableError::InvalidInput`] - `vals.len() != xargs.len() * yargs.len()`
    pub fn new(
        xargs: &[A],
        yargs: &[A],
        vals: &[V],
        interpolant: Interpolant2d,
    ) -> Result<Self, TableError> {
        let xgrid = ArgGrid::new(xargs)?;
        let ygrid = ArgGrid::new(yargs)?;
        if vals.len() != xargs.len() * yargs.len() {
            return Err(TableError::InvalidInput(format!(
                "value array length {} does not match {}x{} grid",
                vals.len(),
                xargs.len(),
                yargs.len()
            )));
        }
        Ok(Self {
            interpolant,
            xgrid,
            ygrid,
            ny: yargs.len(),
            vals: vals.to_vec(),
        })
    }

    /// Smallest x argument.
    #[inline]
    pub fn xmin(&self) -> A {
        self.xgrid.front()
    }

    /// Largest x argument.
    #[inline]
    pub fn xmax(&self) -> A {
        self.xgrid.back()
    }

    /// Smallest y argument.
    #[inline]
    pub fn ymin(&self) -> A {
        self.ygrid.front()
    }

    /// Largest y argument.
    #[inline]
    pub fn ymax(&self) -> A {
        self.ygrid.back()
    }

    /// Number of x arguments.
    #[inline]
    pub fn nx(&self) -> usize {
        self.xgrid.len()
    }

    /// Number of y arguments.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// The x axis, ascending.
    #[inline]
    pub fn x_args(&self) -> &[A] {
        self.xgrid.as_slice()
    }

    /// The y axis, ascending.
    #[inline]
    pub fn y_args(&self) -> &[A] {
        self.ygrid.as_slice()
    }

    /// The value array in x-major order.
    #[inline]
    pub fn vals(&self) -> &[V] {
        &self.vals
    }

    /// The configured interpolation strategy.
    #[inline]
    pub fn interpolant(&self) -> Interpolant2d {
        self.interpolant
    }

    /// Interpolate at `(x, y)`, strictly.
    ///
    /// Bracketing indices are resolved independently on each axis, then the
    /// configured kernel blends or selects among the bracketing cell's
    /// corners.
    ///
    /// # Errors
    ///
    /// [`TableError::OutOfRange`] when either coordinate lies outside its
    /// axis's slop-extended domain.
    pub fn lookup(&self, x: A, y: A) -> Result<V, TableError> {
        let i = self.xgrid.upper_index(x)?;
        let j = self.ygrid.upper_index(y)?;
        Ok(self.kernel(x, y, i, j))
    }

    /// Bulk-interpolate N independent `(x, y)` pairs into `out`.
    ///
    /// The first out-of-range pair aborts the batch; the contents of `out`
    /// are unspecified on error.
    ///
    /// # Errors
    ///
    /// * [`TableError::InvalidInput`] - `xs`, `ys`, `out` differ in length
    /// * [`TableError::OutOfRange`] - a pair outside the domain
    pub fn interp_many_scatter(&self, xs: &[A], ys: &[A], out: &mut [V]) -> Result<(), TableError> {
        if xs.len() != ys.len() || xs.len() != out.len() {
            return Err(TableError::InvalidInput(format!(
                "scatter lengths differ: xs {}, ys {}, out {}",
                xs.len(),
                ys.len(),
                out.len()
            )));
        }
        for ((&x, &y), slot) in xs.iter().zip(ys.iter()).zip(out.iter_mut()) {
            let i = self.xgrid.upper_index(x)?;
            let j = self.ygrid.upper_index(y)?;
            *slot = self.kernel(x, y, i, j);
        }
        Ok(())
    }

    /// Bulk-interpolate the full outer product `xs × ys` into `out` in
    /// x-major order (`out[a * ys.len() + b] = f(xs[a], ys[b])`).
    ///
    /// The x bracket is resolved once per row and reused across that row's
    /// y values. The first out-of-range coordinate aborts the batch; the
    /// contents of `out` are unspecified on error.
    ///
    /// # Errors
    ///
    /// * [`TableError::InvalidInput`] - `out.len() != xs.len() * ys.len()`
    /// * [`TableError::OutOfRange`] - a coordinate outside the domain
    pub fn interp_many_outer(&self, xs: &[A], ys: &[A], out: &mut [V]) -> Result<(), TableError> {
        if out.len() != xs.len() * ys.len() {
            return Err(TableError::InvalidInput(format!(
                "outer-product output length {} does not match {}x{}",
                out.len(),
                xs.len(),
                ys.len()
            )));
        }
        let mut k = 0;
        for &x in xs.iter() {
            let i = self.xgrid.upper_index(x)?;
            for &y in ys.iter() {
                let j = self.ygrid.upper_index(y)?;
                out[k] = self.kernel(x, y, i, j);
                k += 1;
            }
        }
        Ok(())
    }

    /// Value at grid indices `(i, j)` in the x-major array.
    #[inline]
    fn at(&self, i: usize, j: usize) -> V {
        self.vals[i * self.ny + j]
    }

    /// Evaluate the configured kernel on the cell bracketed by `(i, j)`.
    ///
    /// On entry it is only guaranteed that `xgrid[i-1] <= x <= xgrid[i]`
    /// and likewise in y; the step kernels re-check the exact-hit edges to
    /// pick the matching corner.
    fn kernel(&self, x: A, y: A, i: usize, j: usize) -> V {
        match self.interpolant {
            Interpolant2d::Linear => {
                let ax = (self.xgrid[i] - x) / (self.xgrid[i] - self.xgrid[i - 1]);
                let bx = A::one() - ax;
                let ay = (self.ygrid[j] - y) / (self.ygrid[j] - self.ygrid[j - 1]);
                let by = A::one() - ay;
                self.at(i - 1, j - 1) * (ax * ay)
                    + self.at(i, j - 1) * (bx * ay)
                    + self.at(i - 1, j) * (ax * by)
                    + self.at(i, j) * (bx * by)
            }
            Interpolant2d::Floor => {
                let i = if x == self.xgrid[i] { i + 1 } else { i };
                let j = if y == self.ygrid[j] { j + 1 } else { j };
                self.at(i - 1, j - 1)
            }
            Interpolant2d::Ceil => {
                let i = if x == self.xgrid[i - 1] { i - 1 } else { i };
                let j = if y == self.ygrid[j - 1] { j - 1 } else { j };
                self.at(i, j)
            }
            Interpolant2d::Nearest => {
                let i = if (x - self.xgrid[i - 1]) < (self.xgrid[i] - x) {
                    i - 1
                } else {
                    i
                };
                let j = if (y - self.ygrid[j - 1]) < (self.ygrid[j] - y) {
                    j - 1
                } else {
                    j
                };
                self.at(i, j)
            }
        }
    }
}
