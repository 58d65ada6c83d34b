//! Result and Error types for gtools-nist

/// Type alias for Result<T, nist::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `gtools-nist` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to (de)serialise")]
    FailedSerde(#[from] serde_json::Error),

    #[error("no reference data for material \"{0}\"")]
    UnknownMaterial(String),

    #[error("{energy} keV outside of the {material} table ({min} - {max} keV)")]
    EnergyOutsideTable {
        material: String,
        energy: f64,
        min: f64,
        max: f64,
    },

    #[error("photon energy must be positive, found {0} keV")]
    NonPositiveEnergy(f64),

    #[error("invalid reference series for \"{material}\": {reason}")]
    InvalidSeries { material: String, reason: String },
}
