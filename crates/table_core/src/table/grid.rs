//! Sorted argument axis with fast bracketing.

use std::cell::Cell;
use std::ops::Index;

use num_traits::Float;

use super::{EQUAL_SPACING_TOL, SLOP_FRACTION};
use crate::types::TableError;

/// One sorted argument axis of a 2-D table.
///
/// Owns a strictly increasing argument sequence and the acceleration state
/// for bracketing queries on it: an equal-spacing flag with the common step
/// `da`, slop tolerances for the domain edges, and the index cached from the
/// previous query. [`Table2D`](super::Table2D) holds one grid per axis so
/// both axes share identical search semantics.
///
/// The cached index lives in a `Cell`, so queries take `&self` but the type
/// is not `Sync`.
#[derive(Debug, Clone)]
pub struct ArgGrid<A: Float> {
    grid: Vec<A>,
    equal_spaced: bool,
    da: A,
    lower_slop: A,
    upper_slop: A,
    last_index: Cell<usize>,
}

impl<A: Float> ArgGrid<A> {
    /// Build a grid from a strictly increasing argument slice.
    ///
    /// # Errors
    ///
    /// * [`TableError::InsufficientData`] - fewer than 2 arguments
    /// * [`TableError::NonMonotonic`] - arguments not strictly increasing
    pub fn new(args: &[A]) -> Result<Self, TableError> {
        let n = args.len();
        if n < 2 {
            return Err(TableError::InsufficientData { got: n, need: 2 });
        }
        for i in 1..n {
            if args[i] <= args[i - 1] {
                return Err(TableError::NonMonotonic { index: i });
            }
        }

        let front = args[0];
        let back = args[n - 1];
        let da = (back - front) / A::from(n - 1).unwrap();
        let tol = A::from(EQUAL_SPACING_TOL).unwrap();
        let equal_spaced = args
            .iter()
            .enumerate()
            .skip(1)
            .all(|(i, &a)| ((a - front) / da - A::from(i).unwrap()).abs() <= tol);

        let slop = A::from(SLOP_FRACTION).unwrap();
        Ok(Self {
            grid: args.to_vec(),
            equal_spaced,
            da,
            lower_slop: (args[1] - front) * slop,
            upper_slop: (back - args[n - 2]) * slop,
            last_index: Cell::new(1),
        })
    }

    /// Smallest argument on the axis.
    #[inline]
    pub fn front(&self) -> A {
        self.grid[0]
    }

    /// Largest argument on the axis.
    #[inline]
    pub fn back(&self) -> A {
        self.grid[self.grid.len() - 1]
    }

    /// Number of arguments on the axis.
    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Returns true if the axis has no arguments.
    /// Note: construction guarantees at least 2, so this is always false.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// The arguments as a slice, in ascending order.
    #[inline]
    pub fn as_slice(&self) -> &[A] {
        &self.grid
    }

    /// Whether the arguments were detected to be equally spaced.
    #[inline]
    pub fn equal_spaced(&self) -> bool {
        self.equal_spaced
    }

    /// Index of the first argument at or above `a`, clamped to `[1, len-1]`
    /// so `grid[i-1] <= a <= grid[i]` brackets every in-domain query.
    ///
    /// Queries inside the slop band just beyond the domain resolve to the
    /// boundary interval. Resolution is O(1) for equally spaced arguments,
    /// otherwise the cached index and its neighbours are checked before
    /// falling back to binary search.
    ///
    /// # Errors
    ///
    /// [`TableError::OutOfRange`] when `a` lies outside the slop-extended
    /// domain.
    pub fn upper_index(&self, a: A) -> Result<usize, TableError> {
        let front = self.front();
        let back = self.back();
        if a < front - self.lower_slop || a > back + self.upper_slop {
            return Err(TableError::OutOfRange {
                arg: a.to_f64().unwrap_or(f64::NAN),
                min: front.to_f64().unwrap_or(f64::NAN),
                max: back.to_f64().unwrap_or(f64::NAN),
            });
        }
        let n = self.grid.len();
        // Slop band: clamp to the boundary interval.
        if a < front {
            return Ok(1);
        }
        if a > back {
            return Ok(n - 1);
        }

        if self.equal_spaced {
            let mut i = ((a - front) / self.da).ceil().to_usize().unwrap_or(0);
            if i >= n {
                i = n - 1;
            }
            if i == 0 {
                i = 1;
            }
            // The direct formula can land one interval off through round-off.
            while a > self.grid[i] {
                i += 1;
            }
            while a < self.grid[i - 1] {
                i -= 1;
            }
            return Ok(i);
        }

        let mut i = self.last_index.get();
        debug_assert!(i >= 1 && i < n);
        if a < self.grid[i - 1] {
            if i >= 2 && a >= self.grid[i - 2] {
                i -= 1;
            } else {
                i = Self::search(&self.grid, a);
            }
        } else if a > self.grid[i] {
            if i + 1 < n && a <= self.grid[i + 1] {
                i += 1;
            } else {
                i = Self::search(&self.grid, a);
            }
        }
        self.last_index.set(i);
        Ok(i)
    }

    /// Full binary search for the bracketing index.
    fn search(grid: &[A], a: A) -> usize {
        grid.partition_point(|&g| g < a).clamp(1, grid.len() - 1)
    }
}

impl<A: Float> Index<usize> for ArgGrid<A> {
    type Output = A;

    #[inline]
    fn index(&self, i: usize) -> &A {
        &self.grid[i]
    }
}
