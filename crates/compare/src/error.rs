//! Result and Error types for gtools-compare

/// Type alias for `Result<T, compare::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `gtools-compare`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure reading or writing CSV data
    #[error("failed CSV operation")]
    Csv(#[from] csv::Error),

    /// Failure to (de)serialise JSON
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Reference data lookups
    #[error(transparent)]
    Nist(#[from] gtools_nist::Error),

    /// A required input file does not exist
    #[error("required input \"{path}\" does not exist")]
    MissingInput { path: String },

    /// A canonical column is absent from a table
    #[error("missing column \"{column}\" in {path}")]
    MissingColumn { column: String, path: String },

    /// Physically meaningless derived quantity
    #[error("{quantity} is undefined: {reason}")]
    Domain {
        quantity: &'static str,
        reason: String,
    },

    /// Nothing usable left in a series
    #[error("no usable points in the {0} series")]
    EmptySeries(String),

    /// No parsed, default, or computed attenuation coefficient
    #[error("no attenuation coefficient available for \"{0}\"")]
    NoCoefficient(String),
}

impl Error {
    /// Shorthand for [Error::Domain]
    pub(crate) fn domain(quantity: &'static str, reason: impl Into<String>) -> Self {
        Self::Domain {
            quantity,
            reason: reason.into(),
        }
    }
}
