//! One-dimensional lookup table with pluggable interpolation.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::io::BufRead;
use std::str::FromStr;

use num_traits::Float;

use super::{EQUAL_SPACING_TOL, SLOP_FRACTION};
use crate::traits::TableValue;
use crate::types::TableError;

/// Interpolation strategy for a 1-D [`Table`].
///
/// Selected once at construction; the strategy set is closed so kernels
/// dispatch through a single `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolant {
    /// Piecewise linear between the bracketing entries.
    Linear,
    /// Natural cubic spline: zero second derivative at both end points.
    Spline,
    /// Step function using the value at or below the argument.
    Floor,
    /// Step function using the value at or above the argument.
    Ceil,
}

/// A single (argument, value) sample in a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<A, V> {
    /// Sampled argument.
    pub arg: A,
    /// Function value at `arg`.
    pub val: V,
}

/// A lookup table for a sampled function y = f(x).
///
/// Entries are kept sorted by ascending argument. Sorting, equal-spacing
/// detection, edge slop tolerances, and (for the spline interpolant) the
/// natural-spline second derivatives are computed lazily on the first query
/// after a mutation, and the bracketing index from the previous query is
/// cached to accelerate sequential scans.
///
/// # Type Parameters
///
/// * `A` - Argument type: total ordering plus field arithmetic
///   ([`Float`], e.g. `f64`, `f32`)
/// * `V` - Value type: addition, subtraction, and scaling by `A`
///   ([`TableValue`])
///
/// # Query Policies
///
/// Two query paths coexist and callers pick by tolerance for extrapolation:
///
/// - [`lookup`](Self::lookup) is strict: an argument outside the
///   slop-extended domain is a [`TableError::OutOfRange`].
/// - [`eval`](Self::eval) is lenient: an argument outside the sampled
///   domain returns `V::zero()` and never errors.
///
/// # Thread Safety
///
/// Queries take `&self` but mutate interior caches, so `Table` is not
/// `Sync`. Clone per worker or lock externally.
///
/// # Example
///
/// ```
/// use table_core::table::{Interpolant, Table};
///
/// let table = Table::from_slices(
///     &[0.0, 1.0, 2.0, 3.0],
///     &[0.0, 1.0, 4.0, 9.0],
///     Interpolant::Linear,
/// )
/// .unwrap();
///
/// assert_eq!(table.lookup(1.5).unwrap(), 2.5);
/// assert_eq!(table.eval(100.0), 0.0); // out of domain, lenient path
/// assert!(table.lookup(100.0).is_err()); // out of domain, strict path
/// ```
#[derive(Debug, Clone)]
pub struct Table<A: Float, V: TableValue<A>> {
    interpolant: Interpolant,
    entries: RefCell<Vec<Entry<A, V>>>,
    /// Second derivatives for the spline interpolant, same length as
    /// `entries` once prepared.
    y2: RefCell<Vec<V>>,
    ready: Cell<bool>,
    equal_spaced: Cell<bool>,
    dx: Cell<A>,
    lower_slop: Cell<A>,
    upper_slop: Cell<A>,
    last_index: Cell<usize>,
}

impl<A: Float, V: TableValue<A>> Table<A, V> {
    /// Construct an empty table; fill it with [`add_entry`](Self::add_entry).
    pub fn new(interpolant: Interpolant) -> Self {
        Self {
            interpolant,
            entries: RefCell::new(Vec::new()),
            y2: RefCell::new(Vec::new()),
            ready: Cell::new(false),
            equal_spaced: Cell::new(false),
            dx: Cell::new(A::zero()),
            lower_slop: Cell::new(A::zero()),
            upper_slop: Cell::new(A::zero()),
            last_index: Cell::new(1),
        }
    }

    /// Construct from parallel argument/value slices.
    ///
    /// The arguments need not be sorted; the table sorts by argument during
    /// preparation.
    ///
    /// # Errors
    ///
    /// * [`TableError::InvalidInput`] - mismatched slice lengths
    /// * [`TableError::InsufficientData`] - fewer than 2 points
    /// * [`TableError::DuplicateArgument`] - two entries share an argument
    ///
    /// # Example
    ///
    /// ```
    /// use table_core::table::{Interpolant, Table};
    ///
    /// let table =
    ///     Table::from_slices(&[0.0, 1.0], &[0.0, 2.0], Interpolant::Linear).unwrap();
    /// assert_eq!(table.size(), 2);
    /// ```
    pub fn from_slices(args: &[A], vals: &[V], interpolant: Interpolant) -> Result<Self, TableError> {
        if args.len() != vals.len() {
            return Err(TableError::InvalidInput(format!(
                "args and vals must have same length: got {} and {}",
                args.len(),
                vals.len()
            )));
        }
        if args.len() < 2 {
            return Err(TableError::InsufficientData {
                got: args.len(),
                need: 2,
            });
        }
        let table = Self::new(interpolant);
        table.entries.borrow_mut().extend(
            args.iter()
                .zip(vals.iter())
                .map(|(&arg, &val)| Entry { arg, val }),
        );
        table.ensure_ready()?;
        Ok(table)
    }

    /// Construct from argument/value vectors. See [`from_slices`](Self::from_slices).
    ///
    /// # Errors
    ///
    /// Same as [`from_slices`](Self::from_slices).
    pub fn from_vecs(args: Vec<A>, vals: Vec<V>, interpolant: Interpolant) -> Result<Self, TableError> {
        Self::from_slices(&args, &vals, interpolant)
    }

    /// Construct from a stream of whitespace-separated (argument, value)
    /// pairs, one pair per line.
    ///
    /// Blank lines and lines whose first non-blank character is `#`, `;`,
    /// or `!` are skipped. Trailing tokens after the first two are ignored.
    ///
    /// The table is left unprepared, like the incremental path; validation
    /// of entry count and duplicates happens on first query.
    ///
    /// # Errors
    ///
    /// * [`TableError::ReadError`] - a non-comment line does not parse as
    ///   two numeric tokens, carrying the raw line
    /// * [`TableError::InvalidInput`] - the underlying reader failed
    ///
    /// # Example
    ///
    /// ```
    /// use table_core::table::{Interpolant, Table};
    ///
    /// let data = "# radius  flux\n0.0 1.0\n1.0 0.5\n2.0 0.0\n";
    /// let table: Table<f64, f64> =
    ///     Table::from_reader(data.as_bytes(), Interpolant::Linear).unwrap();
    /// assert_eq!(table.size(), 3);
    /// ```
    pub fn from_reader<R: BufRead>(reader: R, interpolant: Interpolant) -> Result<Self, TableError>
    where
        A: FromStr,
        V: FromStr,
    {
        const COMMENT_CHARS: &[char] = &['#', ';', '!'];
        let mut table = Self::new(interpolant);
        for line in reader.lines() {
            let line = line.map_err(|e| TableError::InvalidInput(format!("read failure: {}", e)))?;
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_CHARS) {
                continue;
            }
            let mut tokens = trimmed.split_whitespace();
            let pair = match (tokens.next(), tokens.next()) {
                (Some(a), Some(v)) => match (a.parse::<A>(), v.parse::<V>()) {
                    (Ok(a), Ok(v)) => Some((a, v)),
                    _ => None,
                },
                _ => None,
            };
            match pair {
                Some((a, v)) => table.add_entry(a, v),
                None => return Err(TableError::ReadError { line }),
            }
        }
        Ok(table)
    }

    /// Append one entry.
    ///
    /// Readiness is invalidated; the next query re-sorts and re-prepares.
    /// Duplicate arguments are accepted here and rejected at preparation.
    pub fn add_entry(&mut self, arg: A, val: V) {
        self.entries.get_mut().push(Entry { arg, val });
        self.ready.set(false);
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.get_mut().clear();
        self.y2.get_mut().clear();
        self.ready.set(false);
    }

    /// Number of entries. Independent of preparation state.
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.borrow().len()
    }

    /// The configured interpolation strategy.
    #[inline]
    pub fn interpolant(&self) -> Interpolant {
        self.interpolant
    }

    /// Smallest argument, after ensuring the table is prepared.
    ///
    /// # Errors
    ///
    /// Preparation errors: [`TableError::InsufficientData`],
    /// [`TableError::DuplicateArgument`].
    pub fn arg_min(&self) -> Result<A, TableError> {
        self.ensure_ready()?;
        Ok(self.entries.borrow()[0].arg)
    }

    /// Largest argument, after ensuring the table is prepared.
    ///
    /// # Errors
    ///
    /// Same as [`arg_min`](Self::arg_min).
    pub fn arg_max(&self) -> Result<A, TableError> {
        self.ensure_ready()?;
        let entries = self.entries.borrow();
        Ok(entries[entries.len() - 1].arg)
    }

    /// The sorted (argument, value) pairs, for introspection or rebuilding
    /// an equivalent table.
    ///
    /// # Errors
    ///
    /// Same as [`arg_min`](Self::arg_min).
    pub fn entries(&self) -> Result<Vec<(A, V)>, TableError> {
        self.ensure_ready()?;
        Ok(self.entries.borrow().iter().map(|e| (e.arg, e.val)).collect())
    }

    /// Interpolate at `a`, leniently.
    ///
    /// Arguments outside the sampled domain `[arg_min, arg_max]` return
    /// `V::zero()` instead of an error. Use [`lookup`](Self::lookup) to be
    /// warned of extrapolation attempts.
    ///
    /// # Panics
    ///
    /// Panics if the table cannot be prepared (fewer than 2 entries, or
    /// duplicate arguments) — a fatal precondition violation on this path.
    pub fn eval(&self, a: A) -> V {
        if let Err(err) = self.ensure_ready() {
            panic!("table queried in unusable state: {}", err);
        }
        let entries = self.entries.borrow();
        let y2 = self.y2.borrow();
        if a < entries[0].arg || a > entries[entries.len() - 1].arg {
            return V::zero();
        }
        let i = self.bracket(&entries, a);
        self.kernel(&entries, &y2, a, i)
    }

    /// Interpolate at `a`, strictly.
    ///
    /// # Errors
    ///
    /// * [`TableError::OutOfRange`] - `a` outside the slop-extended domain
    /// * preparation errors as for [`arg_min`](Self::arg_min)
    pub fn lookup(&self, a: A) -> Result<V, TableError> {
        self.ensure_ready()?;
        let entries = self.entries.borrow();
        let y2 = self.y2.borrow();
        let i = self.upper_index(&entries, a)?;
        Ok(self.kernel(&entries, &y2, a, i))
    }

    /// Bulk-interpolate `args` into `vals` with strict lookup semantics.
    ///
    /// The table is prepared once up front and each element reuses the
    /// bracketing index cached by the previous one, which makes monotone
    /// batches nearly free to bracket. The first out-of-range element
    /// aborts the batch; the contents of `vals` are unspecified on error,
    /// so callers should pre-validate the domain when they need all-or-
    /// nothing behaviour.
    ///
    /// # Errors
    ///
    /// * [`TableError::InvalidInput`] - `args` and `vals` differ in length
    /// * [`TableError::OutOfRange`] - an element outside the slop-extended
    ///   domain
    /// * preparation errors as for [`arg_min`](Self::arg_min)
    pub fn interp_many(&self, args: &[A], vals: &mut [V]) -> Result<(), TableError> {
        if args.len() != vals.len() {
            return Err(TableError::InvalidInput(format!(
                "argument and output lengths differ: got {} and {}",
                args.len(),
                vals.len()
            )));
        }
        self.ensure_ready()?;
        let entries = self.entries.borrow();
        let y2 = self.y2.borrow();
        for (&a, out) in args.iter().zip(vals.iter_mut()) {
            let i = self.upper_index(&entries, a)?;
            *out = self.kernel(&entries, &y2, a, i);
        }
        Ok(())
    }

    /// Replace every value with `f(arg, val)` in place, then re-prepare.
    ///
    /// # Errors
    ///
    /// Preparation errors as for [`arg_min`](Self::arg_min).
    pub fn transform_values<F>(&mut self, mut f: F) -> Result<(), TableError>
    where
        F: FnMut(A, V) -> V,
    {
        for e in self.entries.get_mut().iter_mut() {
            e.val = f(e.arg, e.val);
        }
        self.ready.set(false);
        self.ensure_ready()
    }

    /// Replace every argument with `f(arg, val)` in place, then re-prepare
    /// (re-sorting under the new arguments).
    ///
    /// # Errors
    ///
    /// Preparation errors as for [`arg_min`](Self::arg_min); a transform
    /// that maps two arguments to the same value surfaces as
    /// [`TableError::DuplicateArgument`].
    pub fn transform_args<F>(&mut self, mut f: F) -> Result<(), TableError>
    where
        F: FnMut(A, V) -> A,
    {
        for e in self.entries.get_mut().iter_mut() {
            e.arg = f(e.arg, e.val);
        }
        self.ready.set(false);
        self.ensure_ready()
    }

    /// Render the sorted entries as "arg value" lines, one per entry.
    /// A debugging aid, not a hot path.
    ///
    /// # Errors
    ///
    /// Preparation errors as for [`arg_min`](Self::arg_min).
    pub fn dump(&self) -> Result<String, TableError>
    where
        A: std::fmt::Display,
        V: std::fmt::Display,
    {
        self.ensure_ready()?;
        let entries = self.entries.borrow();
        let mut out = String::new();
        for e in entries.iter() {
            out.push_str(&format!("{} {}\n", e.arg, e.val));
        }
        Ok(out)
    }

    /// Sort, validate, and prepare the acceleration state if a mutation
    /// invalidated it. Every query funnels through here first.
    fn ensure_ready(&self) -> Result<(), TableError> {
        if self.ready.get() {
            return Ok(());
        }

        let mut entries = self.entries.borrow_mut();
        let n = entries.len();
        if n < 2 {
            return Err(TableError::InsufficientData { got: n, need: 2 });
        }
        entries.sort_by(|a, b| a.arg.partial_cmp(&b.arg).unwrap_or(Ordering::Equal));
        for i in 1..n {
            if entries[i].arg == entries[i - 1].arg {
                return Err(TableError::DuplicateArgument {
                    arg: entries[i].arg.to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        let front = entries[0].arg;
        let back = entries[n - 1].arg;
        let dx = (back - front) / A::from(n - 1).unwrap();
        let tol = A::from(EQUAL_SPACING_TOL).unwrap();
        let equal_spaced = entries
            .iter()
            .enumerate()
            .skip(1)
            .all(|(i, e)| ((e.arg - front) / dx - A::from(i).unwrap()).abs() <= tol);
        self.equal_spaced.set(equal_spaced);
        self.dx.set(dx);

        let slop = A::from(SLOP_FRACTION).unwrap();
        self.lower_slop.set((entries[1].arg - front) * slop);
        self.upper_slop.set((back - entries[n - 2].arg) * slop);
        self.last_index.set(1);

        if self.interpolant == Interpolant::Spline {
            Self::solve_spline(&entries, &mut self.y2.borrow_mut());
        }

        drop(entries);
        self.ready.set(true);
        Ok(())
    }

    /// Natural cubic spline second derivatives by the Thomas algorithm.
    ///
    /// The tridiagonal system has scalar coefficients (interval widths on
    /// the off-diagonals, `2*(h[i-1]+h[i])` on the diagonal) and value-typed
    /// right-hand sides; both boundary second derivatives are pinned to
    /// zero.
    fn solve_spline(entries: &[Entry<A, V>], y2: &mut Vec<V>) {
        let n = entries.len();
        y2.clear();
        y2.resize(n, V::zero());
        if n < 3 {
            // Two points: the natural spline degenerates to the straight
            // segment, which zero end-point second derivatives already give.
            return;
        }

        let two = A::from(2.0).unwrap();
        let six = A::from(6.0).unwrap();

        let h: Vec<A> = (0..n - 1)
            .map(|i| entries[i + 1].arg - entries[i].arg)
            .collect();

        let interior = n - 2;
        let mut diag: Vec<A> = Vec::with_capacity(interior);
        let mut rhs: Vec<V> = Vec::with_capacity(interior);
        for i in 1..n - 1 {
            diag.push(two * (h[i - 1] + h[i]));
            let d_hi = (entries[i + 1].val - entries[i].val) / h[i];
            let d_lo = (entries[i].val - entries[i - 1].val) / h[i - 1];
            rhs.push((d_hi - d_lo) * six);
        }

        // Forward elimination. Row i couples unknowns i-1, i, i+1 through
        // sub-diagonal h[i] and super-diagonal h[i+1].
        let mut c_prime: Vec<A> = Vec::with_capacity(interior);
        let mut d_prime: Vec<V> = Vec::with_capacity(interior);
        c_prime.push(h[1] / diag[0]);
        d_prime.push(rhs[0] / diag[0]);
        for i in 1..interior {
            let denom = diag[i] - h[i] * c_prime[i - 1];
            let sup = if i < interior - 1 { h[i + 1] } else { A::zero() };
            c_prime.push(sup / denom);
            d_prime.push((rhs[i] - d_prime[i - 1] * h[i]) / denom);
        }

        // Back substitution into the interior second derivatives;
        // y2[0] and y2[n-1] stay zero.
        y2[interior] = d_prime[interior - 1];
        for i in (1..interior).rev() {
            y2[i] = d_prime[i - 1] - y2[i + 1] * c_prime[i - 1];
        }
    }

    /// Strict bracketing: index of the first entry at or above `a`, clamped
    /// to `[1, n-1]`, with an out-of-range check against the slop-extended
    /// domain.
    fn upper_index(&self, entries: &[Entry<A, V>], a: A) -> Result<usize, TableError> {
        let front = entries[0].arg;
        let back = entries[entries.len() - 1].arg;
        if a < front - self.lower_slop.get() || a > back + self.upper_slop.get() {
            return Err(TableError::OutOfRange {
                arg: a.to_f64().unwrap_or(f64::NAN),
                min: front.to_f64().unwrap_or(f64::NAN),
                max: back.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(self.bracket(entries, a))
    }

    /// Bracketing for an argument already known to be inside the
    /// slop-extended domain: equal-spacing formula, then cached index and
    /// neighbours, then binary search.
    fn bracket(&self, entries: &[Entry<A, V>], a: A) -> usize {
        let n = entries.len();
        // Slop band: clamp to the boundary interval.
        if a < entries[0].arg {
            return 1;
        }
        if a > entries[n - 1].arg {
            return n - 1;
        }

        if self.equal_spaced.get() {
            let mut i = ((a - entries[0].arg) / self.dx.get())
                .ceil()
                .to_usize()
                .unwrap_or(0);
            if i >= n {
                i = n - 1;
            }
            if i == 0 {
                i = 1;
            }
            // The direct formula can land one interval off through round-off.
            while a > entries[i].arg {
                i += 1;
            }
            while a < entries[i - 1].arg {
                i -= 1;
            }
            return i;
        }

        let mut i = self.last_index.get();
        debug_assert!(i >= 1 && i < n);
        if a < entries[i - 1].arg {
            if i >= 2 && a >= entries[i - 2].arg {
                i -= 1;
            } else {
                i = Self::search(entries, a);
            }
        } else if a > entries[i].arg {
            if i + 1 < n && a <= entries[i + 1].arg {
                i += 1;
            } else {
                i = Self::search(entries, a);
            }
        }
        self.last_index.set(i);
        i
    }

    /// Full binary search for the bracketing index.
    fn search(entries: &[Entry<A, V>], a: A) -> usize {
        entries
            .partition_point(|e| e.arg < a)
            .clamp(1, entries.len() - 1)
    }

    /// Evaluate the configured kernel on the interval `[i-1, i]`.
    fn kernel(&self, entries: &[Entry<A, V>], y2: &[V], a: A, i: usize) -> V {
        match self.interpolant {
            Interpolant::Linear => {
                let lo = entries[i - 1];
                let hi = entries[i];
                let t = (a - lo.arg) / (hi.arg - lo.arg);
                lo.val + (hi.val - lo.val) * t
            }
            Interpolant::Spline => {
                let lo = entries[i - 1];
                let hi = entries[i];
                let h = hi.arg - lo.arg;
                let aa = (hi.arg - a) / h;
                let bb = A::one() - aa;
                let six = A::from(6.0).unwrap();
                lo.val * aa
                    + hi.val * bb
                    + (y2[i - 1] * (aa * aa * aa - aa) + y2[i] * (bb * bb * bb - bb))
                        * (h * h / six)
            }
            Interpolant::Floor => {
                // The bracket only guarantees arg[i-1] <= a <= arg[i]; an
                // exact hit on the upper bound belongs to the upper entry.
                let i = if a == entries[i].arg { i + 1 } else { i };
                entries[i - 1].val
            }
            Interpolant::Ceil => {
                let i = if a == entries[i - 1].arg { i - 1 } else { i };
                entries[i].val
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_table() -> Table<f64, f64> {
        Table::from_slices(
            &[0.0, 1.0, 2.0, 3.0],
            &[0.0, 2.0, 4.0, 6.0],
            Interpolant::Linear,
        )
        .unwrap()
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_from_slices_minimum_points() {
        let table = Table::from_slices(&[0.0, 1.0], &[0.0, 1.0], Interpolant::Linear).unwrap();
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn test_from_slices_mismatched_lengths() {
        let result = Table::from_slices(&[0.0, 1.0, 2.0], &[0.0, 1.0], Interpolant::Linear);
        match result.unwrap_err() {
            TableError::InvalidInput(msg) => assert!(msg.contains("same length")),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_from_slices_insufficient_data() {
        let result = Table::from_slices(&[1.0], &[2.0], Interpolant::Linear);
        match result.unwrap_err() {
            TableError::InsufficientData { got, need } => {
                assert_eq!(got, 1);
                assert_eq!(need, 2);
            }
            _ => panic!("Expected InsufficientData error"),
        }
    }

    #[test]
    fn test_from_slices_rejects_duplicate_arguments() {
        let result =
            Table::from_slices(&[0.0, 1.0, 1.0, 2.0], &[0.0, 1.0, 2.0, 3.0], Interpolant::Linear);
        match result.unwrap_err() {
            TableError::DuplicateArgument { arg } => assert_eq!(arg, 1.0),
            _ => panic!("Expected DuplicateArgument error"),
        }
    }

    #[test]
    fn test_from_slices_auto_sorts() {
        let table = Table::from_slices(
            &[3.0, 1.0, 2.0, 0.0],
            &[9.0, 1.0, 4.0, 0.0],
            Interpolant::Linear,
        )
        .unwrap();
        let pairs = table.entries().unwrap();
        assert_eq!(pairs, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 9.0)]);
    }

    #[test]
    fn test_from_vecs() {
        let table = Table::from_vecs(vec![0.0, 1.0], vec![5.0, 7.0], Interpolant::Linear).unwrap();
        assert_eq!(table.lookup(0.0).unwrap(), 5.0);
    }

    #[test]
    fn test_interpolant_accessor() {
        let table = linear_table();
        assert_eq!(table.interpolant(), Interpolant::Linear);
    }

    // ========================================
    // Stream Reader Tests
    // ========================================

    #[test]
    fn test_from_reader_basic() {
        let data = "0.0 0.0\n1.0 2.0\n2.0 4.0\n";
        let table: Table<f64, f64> = Table::from_reader(data.as_bytes(), Interpolant::Linear).unwrap();
        assert_eq!(table.size(), 3);
        assert_eq!(table.lookup(0.5).unwrap(), 1.0);
    }

    #[test]
    fn test_from_reader_skips_blank_and_comment_lines() {
        let data = "# header comment\n\n  \n; semicolon comment\n! bang comment\n0.0 1.0\n1.0 3.0\n";
        let table: Table<f64, f64> = Table::from_reader(data.as_bytes(), Interpolant::Linear).unwrap();
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn test_from_reader_malformed_line_reports_content() {
        let data = "0.0 1.0\n1.0 banana\n";
        let result: Result<Table<f64, f64>, _> =
            Table::from_reader(data.as_bytes(), Interpolant::Linear);
        match result.unwrap_err() {
            TableError::ReadError { line } => assert_eq!(line, "1.0 banana"),
            _ => panic!("Expected ReadError"),
        }
    }

    #[test]
    fn test_from_reader_missing_token() {
        let data = "0.0 1.0\n2.0\n";
        let result: Result<Table<f64, f64>, _> =
            Table::from_reader(data.as_bytes(), Interpolant::Linear);
        match result.unwrap_err() {
            TableError::ReadError { line } => assert_eq!(line, "2.0"),
            _ => panic!("Expected ReadError"),
        }
    }

    // ========================================
    // Incremental Construction Tests
    // ========================================

    #[test]
    fn test_add_entry_round_trip_insertion_order_independent() {
        // Inserting in scrambled order must not affect post-sort results.
        let args = [4.0, 0.5, 2.0, 3.5, 1.0, 3.0, 0.0];
        let mut table = Table::new(Interpolant::Linear);
        for &a in args.iter() {
            table.add_entry(a, a * a);
        }
        for &a in args.iter() {
            assert_relative_eq!(table.lookup(a).unwrap(), a * a);
        }
    }

    #[test]
    fn test_add_entry_invalidates_bounds() {
        let mut table = Table::new(Interpolant::Linear);
        table.add_entry(0.0, 0.0);
        table.add_entry(1.0, 1.0);
        assert_eq!(table.arg_max().unwrap(), 1.0);
        table.add_entry(5.0, 2.0);
        assert_eq!(table.arg_max().unwrap(), 5.0);
    }

    #[test]
    fn test_lookup_on_empty_table_errors() {
        let table: Table<f64, f64> = Table::new(Interpolant::Linear);
        match table.lookup(0.5).unwrap_err() {
            TableError::InsufficientData { got, need } => {
                assert_eq!(got, 0);
                assert_eq!(need, 2);
            }
            _ => panic!("Expected InsufficientData error"),
        }
    }

    #[test]
    #[should_panic(expected = "unusable state")]
    fn test_eval_on_empty_table_panics() {
        let table: Table<f64, f64> = Table::new(Interpolant::Linear);
        let _ = table.eval(0.5);
    }

    #[test]
    fn test_clear() {
        let mut table = linear_table();
        table.clear();
        assert_eq!(table.size(), 0);
        assert!(table.lookup(0.5).is_err());
    }

    // ========================================
    // Bounds Tests
    // ========================================

    #[test]
    fn test_arg_min_arg_max() {
        let table = linear_table();
        assert_eq!(table.arg_min().unwrap(), 0.0);
        assert_eq!(table.arg_max().unwrap(), 3.0);
    }

    #[test]
    fn test_arg_min_sorts_first() {
        let mut table = Table::new(Interpolant::Linear);
        table.add_entry(2.0, 4.0);
        table.add_entry(-1.0, 1.0);
        table.add_entry(1.0, 1.0);
        assert_eq!(table.arg_min().unwrap(), -1.0);
        assert_eq!(table.arg_max().unwrap(), 2.0);
    }

    // ========================================
    // Linear Interpolation Tests
    // ========================================

    #[test]
    fn test_linear_exact_on_collinear_points() {
        // Points on y = 2x: interior queries reproduce the line exactly.
        let table = linear_table();
        for &x in [0.25, 0.5, 1.1, 1.9, 2.5, 2.999].iter() {
            assert_relative_eq!(table.lookup(x).unwrap(), 2.0 * x, max_relative = 1e-14);
        }
    }

    #[test]
    fn test_boundary_exactness_all_interpolants() {
        let args = [0.0, 1.0, 2.0, 3.0];
        let vals = [1.0, 3.0, 2.0, 5.0];
        for interp in [
            Interpolant::Linear,
            Interpolant::Spline,
            Interpolant::Floor,
            Interpolant::Ceil,
        ] {
            let table = Table::from_slices(&args, &vals, interp).unwrap();
            for (&a, &v) in args.iter().zip(vals.iter()) {
                assert_relative_eq!(table.lookup(a).unwrap(), v, max_relative = 1e-14);
                assert_relative_eq!(table.eval(a), v, max_relative = 1e-14);
            }
        }
    }

    #[test]
    fn test_linear_non_uniform_spacing() {
        let table = Table::from_slices(
            &[0.0, 0.1, 1.0, 10.0],
            &[0.0, 1.0, 2.0, 3.0],
            Interpolant::Linear,
        )
        .unwrap();
        assert_relative_eq!(table.lookup(0.05).unwrap(), 0.5);
        assert_relative_eq!(table.lookup(0.55).unwrap(), 1.5);
        assert_relative_eq!(table.lookup(5.5).unwrap(), 2.5);
    }

    // ========================================
    // Step Interpolation Tests
    // ========================================

    #[test]
    fn test_floor_interpolation() {
        let table = Table::from_slices(
            &[0.0, 1.0, 2.0],
            &[10.0, 20.0, 30.0],
            Interpolant::Floor,
        )
        .unwrap();
        assert_eq!(table.lookup(0.5).unwrap(), 10.0);
        assert_eq!(table.lookup(1.5).unwrap(), 20.0);
        // Exact hits take the entry itself, including the last one.
        assert_eq!(table.lookup(1.0).unwrap(), 20.0);
        assert_eq!(table.lookup(2.0).unwrap(), 30.0);
        assert_eq!(table.lookup(0.0).unwrap(), 10.0);
    }

    #[test]
    fn test_ceil_interpolation() {
        let table = Table::from_slices(
            &[0.0, 1.0, 2.0],
            &[10.0, 20.0, 30.0],
            Interpolant::Ceil,
        )
        .unwrap();
        assert_eq!(table.lookup(0.5).unwrap(), 20.0);
        assert_eq!(table.lookup(1.5).unwrap(), 30.0);
        // Exact hits take the entry itself, including the first one.
        assert_eq!(table.lookup(1.0).unwrap(), 20.0);
        assert_eq!(table.lookup(0.0).unwrap(), 10.0);
        assert_eq!(table.lookup(2.0).unwrap(), 30.0);
    }

    // ========================================
    // Spline Interpolation Tests
    // ========================================

    #[test]
    fn test_spline_reference_three_points() {
        // Natural spline through (0,0), (1,1), (2,4): the tridiagonal solve
        // gives y2 = [0, 3, 0], so f(0.5) = 0.5 - (3/8 * 3)/6 = 0.3125.
        let table =
            Table::from_slices(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], Interpolant::Spline).unwrap();
        assert_relative_eq!(table.lookup(0.5).unwrap(), 0.3125, max_relative = 1e-15);
    }

    #[test]
    fn test_spline_linear_data_stays_linear() {
        let table = Table::from_slices(
            &[0.0, 1.0, 2.0, 3.0],
            &[0.0, 2.0, 4.0, 6.0],
            Interpolant::Spline,
        )
        .unwrap();
        for &x in [0.5, 1.5, 2.5].iter() {
            assert_relative_eq!(table.lookup(x).unwrap(), 2.0 * x, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_spline_two_points_is_straight_segment() {
        let table = Table::from_slices(&[0.0, 2.0], &[0.0, 4.0], Interpolant::Spline).unwrap();
        assert_relative_eq!(table.lookup(1.0).unwrap(), 2.0);
    }

    #[test]
    fn test_spline_passes_through_knots_five_points() {
        let args = [0.0, 1.0, 2.0, 3.0, 4.0];
        let vals = [0.0, 1.0, 4.0, 9.0, 16.0];
        let table = Table::from_slices(&args, &vals, Interpolant::Spline).unwrap();
        for (&a, &v) in args.iter().zip(vals.iter()) {
            assert_relative_eq!(table.lookup(a).unwrap(), v, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_spline_smooth_at_interior_knots() {
        let args = [0.0, 1.0, 2.0, 3.0, 4.0];
        let vals = [0.0, 1.0, 4.0, 9.0, 16.0];
        let table = Table::from_slices(&args, &vals, Interpolant::Spline).unwrap();
        // First derivative continuity across each interior knot.
        for &knot in &args[1..args.len() - 1] {
            let h = 1e-6;
            let left = (table.lookup(knot).unwrap() - table.lookup(knot - h).unwrap()) / h;
            let right = (table.lookup(knot + h).unwrap() - table.lookup(knot).unwrap()) / h;
            assert!(
                (right - left).abs() < 1e-3,
                "derivative jump at knot {}: left={}, right={}",
                knot,
                left,
                right
            );
        }
    }

    // ========================================
    // Range Policy Tests
    // ========================================

    #[test]
    fn test_lookup_out_of_range_errors_eval_does_not() {
        let table = linear_table();
        // Far beyond max: three orders of magnitude past the last gap.
        match table.lookup(1003.0).unwrap_err() {
            TableError::OutOfRange { arg, min, max } => {
                assert_eq!(arg, 1003.0);
                assert_eq!(min, 0.0);
                assert_eq!(max, 3.0);
            }
            _ => panic!("Expected OutOfRange error"),
        }
        assert!(table.lookup(-1003.0).is_err());
        assert_eq!(table.eval(1003.0), 0.0);
        assert_eq!(table.eval(-1003.0), 0.0);
    }

    #[test]
    fn test_lookup_accepts_slop_band() {
        let table = linear_table();
        // Within a gap * 1e-6 of the edges: treated as a boundary hit.
        assert!(table.lookup(-1e-8).is_ok());
        assert!(table.lookup(3.0 + 1e-8).is_ok());
        assert_relative_eq!(table.lookup(3.0 + 1e-8).unwrap(), 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_eval_strict_domain_zero_fallback() {
        // eval's domain is the sampled range itself, without slop.
        let table = linear_table();
        assert_eq!(table.eval(-1e-8), 0.0);
        assert_eq!(table.eval(3.0 + 1e-8), 0.0);
        assert_relative_eq!(table.eval(3.0), 6.0);
    }

    // ========================================
    // Fast Path / Cache Tests
    // ========================================

    #[test]
    fn test_equal_spacing_fast_path_matches_closed_form() {
        let args: Vec<f64> = (0..101).map(|i| i as f64 * 0.01).collect();
        let vals: Vec<f64> = args.iter().map(|&x| 3.0 * x + 1.0).collect();
        let table = Table::from_slices(&args, &vals, Interpolant::Linear).unwrap();
        for k in 0..1000 {
            let x = k as f64 * 0.001;
            assert_relative_eq!(table.lookup(x).unwrap(), 3.0 * x + 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_sequential_and_shuffled_queries_agree() {
        // Non-uniform spacing exercises the cached-index tiers; the answer
        // must not depend on query order.
        let args = [0.0, 0.1, 0.35, 1.0, 2.5, 2.6, 4.0];
        let vals = [1.0, 2.0, 0.5, 3.0, -1.0, 0.0, 2.0];
        let table = Table::from_slices(&args, &vals, Interpolant::Linear).unwrap();

        let queries = [0.05, 0.2, 0.7, 1.5, 2.55, 3.0, 3.9];
        let sequential: Vec<f64> = queries.iter().map(|&q| table.lookup(q).unwrap()).collect();

        let shuffled_order = [5, 0, 3, 6, 1, 4, 2];
        for &k in shuffled_order.iter() {
            assert_eq!(table.lookup(queries[k]).unwrap(), sequential[k]);
        }
    }

    // ========================================
    // Bulk Evaluation Tests
    // ========================================

    #[test]
    fn test_interp_many_matches_individual_lookups() {
        let table = linear_table();
        let queries = [0.0, 0.4, 1.1, 2.9, 3.0, 2.0, 0.5];
        let mut out = vec![0.0; queries.len()];
        table.interp_many(&queries, &mut out).unwrap();
        for (&q, &v) in queries.iter().zip(out.iter()) {
            assert_eq!(v, table.lookup(q).unwrap());
        }
    }

    #[test]
    fn test_interp_many_aborts_on_out_of_range() {
        let table = linear_table();
        let queries = [0.5, 99.0, 1.5];
        let mut out = vec![0.0; 3];
        assert!(matches!(
            table.interp_many(&queries, &mut out),
            Err(TableError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_interp_many_length_mismatch() {
        let table = linear_table();
        let mut out = vec![0.0; 2];
        assert!(matches!(
            table.interp_many(&[0.5, 1.0, 1.5], &mut out),
            Err(TableError::InvalidInput(_))
        ));
    }

    // ========================================
    // Transform Tests
    // ========================================

    #[test]
    fn test_transform_values() {
        let mut table = linear_table();
        table.transform_values(|_, v| v * 10.0).unwrap();
        assert_relative_eq!(table.lookup(1.5).unwrap(), 30.0);
    }

    #[test]
    fn test_transform_values_uses_argument() {
        let mut table =
            Table::from_slices(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0], Interpolant::Linear).unwrap();
        table.transform_values(|a, v| v * a).unwrap();
        assert_relative_eq!(table.lookup(2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_transform_args_resorts() {
        let mut table = linear_table();
        // Negating arguments reverses the order; the table must re-sort.
        table.transform_args(|a, _| -a).unwrap();
        assert_eq!(table.arg_min().unwrap(), -3.0);
        assert_eq!(table.arg_max().unwrap(), 0.0);
        assert_relative_eq!(table.lookup(-1.5).unwrap(), 3.0);
    }

    #[test]
    fn test_transform_args_collision_is_rejected() {
        let mut table = linear_table();
        let result = table.transform_args(|_, _| 1.0);
        assert!(matches!(result, Err(TableError::DuplicateArgument { .. })));
    }

    // ========================================
    // Dump / Introspection Tests
    // ========================================

    #[test]
    fn test_dump_lists_sorted_entries() {
        let mut table = Table::new(Interpolant::Linear);
        table.add_entry(1.0, 2.0);
        table.add_entry(0.0, 1.0);
        assert_eq!(table.dump().unwrap(), "0 1\n1 2\n");
    }

    #[test]
    fn test_entries_round_trip_rebuild() {
        let source = linear_table();
        let pairs = source.entries().unwrap();
        let (args, vals): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let rebuilt = Table::from_vecs(args, vals, source.interpolant()).unwrap();
        assert_eq!(rebuilt.lookup(1.7).unwrap(), source.lookup(1.7).unwrap());
    }

    // ========================================
    // Generic Instantiation Tests
    // ========================================

    #[test]
    fn test_with_f32() {
        let table = Table::from_slices(
            &[0.0_f32, 1.0, 2.0],
            &[0.0_f32, 2.0, 4.0],
            Interpolant::Linear,
        )
        .unwrap();
        let y = table.lookup(0.5_f32).unwrap();
        assert!((y - 1.0_f32).abs() < 1e-6);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut table = linear_table();
        let snapshot = table.clone();
        table.add_entry(10.0, -1.0);
        assert_eq!(snapshot.size(), 4);
        assert_eq!(table.size(), 5);
        assert!(snapshot.lookup(10.0).is_err());
    }
}
