// crate modules
use crate::calc;
use crate::config::FallbackTable;
use crate::error::{Error, Result};
use crate::point::ThicknessPoint;

// gtools modules
use gtools_fit::{Field, FitReport};
use gtools_utils::OptionExt;

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Where the values of a [FitResult] came from
///
/// Ordered from most to least trustworthy, so the overall source of a result
/// is the maximum of its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    /// Everything read from the fit report
    Parsed,
    /// At least one value recomputed from the measured series
    FallbackComputed,
    /// The coefficient is a configured default
    Default,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Source::Parsed => "parsed",
            Source::FallbackComputed => "computed",
            Source::Default => "default",
        };
        write!(f, "{s}")
    }
}

/// Resolved Beer-Lambert fit parameters for one material
///
/// R² is only ever present when it is trustworthy, either parsed within
/// [0,1] or recomputed from the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Attenuation coefficient (cm⁻¹)
    pub mu: f64,
    /// Uncertainty on μ (cm⁻¹)
    pub mu_error: f64,
    /// Coefficient of determination, if available
    pub r_squared: Option<f64>,
    /// Provenance of the values
    pub source: Source,
}

impl FitResult {
    /// Resolve fit parameters from a report, a measured series, and defaults
    ///
    /// The coefficient is taken from the first of these that is usable:
    ///
    /// 1. the μ ± σ parsed from the report
    /// 2. the configured default for the material
    /// 3. a weighted Beer-Lambert fit of the series
    ///
    /// R² is taken from the report when valid, otherwise recomputed from the
    /// series with the resolved μ. An invalid R² in the report always
    /// downgrades the source, even when it cannot be recomputed.
    ///
    /// ```rust
    /// # use gtools_compare::{FallbackTable, FitResult, Source, ThicknessPoint};
    /// # use gtools_fit::parse_fit_report;
    /// let series: Vec<ThicknessPoint> = [1.0, 2.0, 5.0]
    ///     .iter()
    ///     .map(|x| ThicknessPoint::new(*x, (-0.043 * x).exp(), 0.001))
    ///     .collect();
    ///
    /// // no R² line, so R² is recomputed
    /// let report = parse_fit_report("μ = 0.0430 +/- 0.0002 cm⁻¹");
    /// let fit = FitResult::resolve(&report, "water", &series, &FallbackTable::default()).unwrap();
    ///
    /// assert_eq!(fit.source, Source::FallbackComputed);
    /// assert!(fit.r_squared.unwrap() > 0.9999);
    /// ```
    pub fn resolve(
        report: &FitReport,
        material: &str,
        series: &[ThicknessPoint],
        fallback: &FallbackTable,
    ) -> Result<Self> {
        let (mu, mu_error, mu_source) = resolve_mu(report, material, series, fallback)?;
        let (r_squared, r2_source) = resolve_r_squared(&report.r_squared, series, mu);

        let source = match r2_source {
            Some(s) => mu_source.max(s),
            None => mu_source,
        };

        debug!(
            "{material} fit: μ = {mu} +/- {mu_error}, R² = {}, {source}",
            r_squared.display()
        );

        Ok(Self {
            mu,
            mu_error,
            r_squared,
            source,
        })
    }

    /// Half-value layer of the fitted coefficient (cm)
    pub fn half_value_layer(&self) -> Result<f64> {
        calc::half_value_layer(self.mu)
    }

    /// Tenth-value layer of the fitted coefficient (cm)
    pub fn tenth_value_layer(&self) -> Result<f64> {
        calc::tenth_value_layer(self.mu)
    }

    /// Beer-Lambert transmission predicted at a thickness
    pub fn transmission(&self, thickness_cm: f64) -> f64 {
        calc::beer_lambert(self.mu, thickness_cm)
    }
}

fn resolve_mu(
    report: &FitReport,
    material: &str,
    series: &[ThicknessPoint],
    fallback: &FallbackTable,
) -> Result<(f64, f64, Source)> {
    match &report.mu {
        Field::Parsed(m) => return Ok((m.value, m.uncertainty, Source::Parsed)),
        Field::Invalid(reason) => warn!("Discarding {material} μ from report: {reason}"),
        Field::Missing => warn!("No {material} μ in report"),
    }

    if let Some(m) = fallback.get(material) {
        warn!("Using default {material} μ = {m}");
        return Ok((m.value, m.uncertainty, Source::Default));
    }

    match calc::weighted_fit(series) {
        Ok(fit) => {
            warn!("Using {material} μ fitted to {} points", fit.points);
            Ok((fit.mu, fit.mu_error, Source::FallbackComputed))
        }
        Err(e) => {
            warn!("Unable to fit {material} series: {e}");
            Err(Error::NoCoefficient(material.to_string()))
        }
    }
}

fn resolve_r_squared(
    parsed: &Field<f64>,
    series: &[ThicknessPoint],
    mu: f64,
) -> (Option<f64>, Option<Source>) {
    // a discarded R² downgrades the fit even when nothing replaces it
    let discarded = match parsed {
        Field::Parsed(r2) => return (Some(*r2), Some(Source::Parsed)),
        Field::Invalid(reason) => {
            warn!("Discarding R² from report: {reason}");
            Some(Source::FallbackComputed)
        }
        Field::Missing => {
            debug!("No R² in report");
            None
        }
    };

    if series.is_empty() {
        return (None, discarded);
    }

    match calc::r_squared(series, mu) {
        Ok(r2) => (Some(r2), Some(Source::FallbackComputed)),
        Err(e) => {
            warn!("R² unavailable: {e}");
            (None, discarded)
        }
    }
}
