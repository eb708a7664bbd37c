//! Error types for table construction and queries.

use thiserror::Error;

/// Categorised lookup-table errors.
///
/// Strict query paths (`lookup`, bulk evaluation, axis bracketing) report
/// `OutOfRange`; construction and preparation report the remaining variants.
/// The lenient call path (`Table::eval`) never returns errors.
///
/// Out-of-range payloads are carried as `f64` regardless of the table's
/// argument type, converted with `to_f64()` at the reporting site.
///
/// # Examples
/// ```
/// use table_core::types::TableError;
///
/// let err = TableError::OutOfRange { arg: 5.0, min: 0.0, max: 3.0 };
/// assert_eq!(format!("{}", err), "Argument 5 out of range [0, 3]");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableError {
    /// Query argument outside the slop-extended sampled domain.
    #[error("Argument {arg} out of range [{min}, {max}]")]
    OutOfRange {
        /// The query argument that fell outside the domain.
        arg: f64,
        /// Smallest sampled argument.
        min: f64,
        /// Largest sampled argument.
        max: f64,
    },

    /// Malformed line while reading whitespace-separated (argument, value)
    /// pairs from a stream.
    #[error("Data read error for line -> {line}")]
    ReadError {
        /// The raw offending line.
        line: String,
    },

    /// Too few entries for the requested operation.
    #[error("Insufficient table entries: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of entries present.
        got: usize,
        /// Minimum number of entries required.
        need: usize,
    },

    /// Two entries share the same argument, which would produce a
    /// zero-width interpolation interval.
    #[error("Duplicate argument {arg} in table")]
    DuplicateArgument {
        /// The repeated argument.
        arg: f64,
    },

    /// A 2-D axis is not strictly increasing.
    #[error("Axis arguments are not strictly increasing at index {index}")]
    NonMonotonic {
        /// Index of the first offending axis element.
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
