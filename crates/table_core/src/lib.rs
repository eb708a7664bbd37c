//! # table_core: generic lookup tables for sampled functions
//!
//! This crate provides the lookup-table engine used to represent and
//! interpolate sampled functions y = f(x) and z = f(x, y):
//!
//! - [`table::Table`]: a 1-D associative table over sorted (argument, value)
//!   entries with linear, natural-cubic-spline, floor, and ceil interpolation
//! - [`table::Table2D`]: a dense rectangular grid over two argument axes with
//!   bilinear, floor, ceil, and nearest interpolation
//! - [`table::ArgGrid`]: a single sorted argument axis with the shared
//!   bracketing-index machinery (equal-spacing fast path, cached index,
//!   binary search)
//! - [`traits::FluxDensity`]: the single-argument evaluation capability
//!   expected by photon-sampling consumers, plus a table-backed adapter
//!
//! ## Genericity
//!
//! Tables are generic over an argument type `A: Float` (total ordering plus
//! field arithmetic) and a value type `V` constrained by
//! [`traits::TableValue`] (addition, subtraction, and scaling by `A`). Both
//! `f64` and `f32` instantiations work out of the box.
//!
//! ## Concurrency
//!
//! Tables are single-threaded data structures. Queries accelerate repeated
//! nearby lookups through interior-mutable caches (`Cell`/`RefCell`), so
//! [`table::Table`] and [`table::Table2D`] are deliberately not `Sync`:
//! give each worker its own clone, or wrap a shared instance in a lock.
//!
//! ## Example
//!
//! ```
//! use table_core::table::{Interpolant, Table};
//!
//! let args = [0.0f64, 1.0, 2.0, 3.0];
//! let vals = [0.0f64, 2.0, 4.0, 6.0];
//!
//! let table = Table::from_slices(&args, &vals, Interpolant::Linear).unwrap();
//! let y = table.lookup(1.5).unwrap();
//! assert!((y - 3.0).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod table;
pub mod traits;
pub mod types;
