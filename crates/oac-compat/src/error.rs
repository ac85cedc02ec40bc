//! Error taxonomy for the conversion core.
//!
//! Only structural problems are errors. Feature degradation is always a
//! warning string on a successful result, never an `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source text does not parse as the structure the adapter requires.
    #[error("invalid config format: {0}")]
    InvalidConfig(String),

    /// A recognized frontmatter key holds a value of the wrong shape.
    #[error("invalid value for '{key}': expected {expected}")]
    FieldType {
        key: String,
        expected: &'static str,
    },

    /// Merging requires at least one agent.
    #[error("cannot merge an empty agent list")]
    EmptyMerge,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
