//! Result and Error types for gtools-fit

/// Type alias for `Result<T, fit::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `gtools-fit` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("fit report \"{0}\" not found")]
    ReportNotFound(String),
}
