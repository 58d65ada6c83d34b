// Crate types
use crate::error::{Error, Result};
use crate::field::{Field, Measurement};
use crate::parsers::{
    extract, normalise, CHI2_NDF, ENERGY, HALF_VALUE_LAYER, MATERIAL, MU, R_SQUARED,
    TENTH_VALUE_LAYER,
};

// Other libraries
use gtools_utils::f;
use log::{info, warn};
use std::path::Path;

/// Every labelled field found in a fit result report
///
/// Fields are extracted independently. One malformed line never affects any
/// other field, and every field records whether it was found, missing, or
/// rejected.
///
/// The report itself makes no attempt at fallbacks. Deciding what to do about
/// a missing coefficient or an untrustworthy R² is left to the caller, which
/// knows about the measured series and any configured defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Material named in the report header
    pub material: Field<String>,
    /// Beam energy (keV)
    pub energy_kev: Field<f64>,
    /// Fitted linear attenuation coefficient (cm⁻¹)
    pub mu: Field<Measurement>,
    /// Coefficient of determination, only ever `Parsed` within [0,1]
    pub r_squared: Field<f64>,
    /// Reduced chi-squared of the fit
    pub chi2_ndf: Field<f64>,
    /// Half-value layer quoted in the report (cm)
    pub half_value_layer: Field<f64>,
    /// Tenth-value layer quoted in the report (cm)
    pub tenth_value_layer: Field<f64>,
}

impl Default for FitReport {
    fn default() -> Self {
        Self {
            material: Field::Missing,
            energy_kev: Field::Missing,
            mu: Field::Missing,
            r_squared: Field::Missing,
            chi2_ndf: Field::Missing,
            half_value_layer: Field::Missing,
            tenth_value_layer: Field::Missing,
        }
    }
}

impl FitReport {
    /// Extract every known field from raw report text
    ///
    /// Equivalent to [parse_fit_report()].
    pub fn parse(text: &str) -> Self {
        let text = normalise(text);
        let lines: Vec<&str> = text.lines().collect();

        Self {
            material: extract(&lines, &MATERIAL),
            energy_kev: extract(&lines, &ENERGY),
            mu: extract(&lines, &MU),
            r_squared: extract(&lines, &R_SQUARED),
            chi2_ndf: extract(&lines, &CHI2_NDF),
            half_value_layer: extract(&lines, &HALF_VALUE_LAYER),
            tenth_value_layer: extract(&lines, &TENTH_VALUE_LAYER),
        }
    }

    /// Read and parse a report file, failing if it can not be read
    ///
    /// Use [read_fit_report()] for the lenient behaviour, where a missing file
    /// is just a report with nothing in it.
    ///
    /// ```rust, no_run
    /// # use gtools_fit::FitReport;
    /// let report = FitReport::from_file("path/to/fit_water_results.txt").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ReportNotFound(path.display().to_string()));
        }

        info!("Reading {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// True if nothing at all was found
    pub fn is_empty(&self) -> bool {
        self.material.is_missing()
            && self.energy_kev.is_missing()
            && self.mu.is_missing()
            && self.r_squared.is_missing()
            && self.chi2_ndf.is_missing()
            && self.half_value_layer.is_missing()
            && self.tenth_value_layer.is_missing()
    }
}

impl std::fmt::Display for FitReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Fit report\n".to_string();
        s += &f!("  Material         {}\n", self.material);
        s += &f!("  Energy           {} keV\n", self.energy_kev);
        s += &f!("  μ                {} cm⁻¹\n", self.mu);
        s += &f!("  R²               {}\n", self.r_squared);
        s += &f!("  χ²/ndf           {}\n", self.chi2_ndf);
        s += &f!("  Half-value layer {} cm\n", self.half_value_layer);
        s += &f!("  Tenth-value layer {} cm", self.tenth_value_layer);
        write!(f, "{s}")
    }
}

/// Parse fit report text
///
/// Literal `\n` escape sequences are treated as line breaks.
///
/// ```rust
/// # use gtools_fit::{parse_fit_report, Field, Measurement};
/// let text = "Material: Water\nμ = 0.0430 +/- 0.0002 cm⁻¹\nR² = 0.9987";
/// let report = parse_fit_report(text);
///
/// assert_eq!(report.material, Field::Parsed("Water".to_string()));
/// assert_eq!(report.mu, Field::Parsed(Measurement::new(0.0430, 0.0002)));
/// assert_eq!(report.r_squared, Field::Parsed(0.9987));
/// assert!(report.chi2_ndf.is_missing());
/// ```
pub fn parse_fit_report(text: &str) -> FitReport {
    FitReport::parse(text)
}

/// Read a fit report, treating any failure as an empty report
///
/// The fit report is optional input. A missing or unreadable file is logged
/// as a warning and every field of the returned report is `Missing`.
///
/// ```rust
/// # use gtools_fit::read_fit_report;
/// let report = read_fit_report("does/not/exist.txt");
/// assert!(report.is_empty());
/// ```
pub fn read_fit_report<P: AsRef<Path>>(path: P) -> FitReport {
    match FitReport::from_file(&path) {
        Ok(report) => report,
        Err(e) => {
            warn!("{e}, continuing without fit results");
            FitReport::default()
        }
    }
}
