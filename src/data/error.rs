use thiserror::Error;

use super::model::Value;

/// Failure taxonomy of the data core.
///
/// Everything here is fatal to the operation that raised it. "No
/// prior-period data" is deliberately not an error: it is the
/// [`Delta::Unavailable`](super::metric::Delta) value.
#[derive(Debug, Error)]
pub enum DashError {
    /// Resource unreachable or not parseable as a table. Callers must not
    /// substitute empty data for a failed load.
    #[error("failed to load `{resource}`: {reason}")]
    Fetch { resource: String, reason: String },

    /// A predicate, aggregation, or rename referenced a column the table
    /// does not have. Indicates a programming or configuration mistake.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// A group key fell outside a label function's domain.
    #[error("group key `{0:?}` outside label domain")]
    KeyOutOfRange(Value),

    /// A mean was requested for the displayed period but the period has no
    /// observations. Never silently coerced to zero or NaN.
    #[error("mean requested over an empty value sequence")]
    EmptyMean,

    /// CSV serialization failed.
    #[error("csv encoding failed: {0}")]
    Encode(String),
}
