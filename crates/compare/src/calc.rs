//! Derived physical quantities
//!
//! Pure functions of their inputs. Anything physically meaningless (a
//! non-positive attenuation coefficient, a zero reference, a logarithm of
//! zero transmission) is an explicit [Error::Domain] and never coerced to
//! zero or infinity.

// crate modules
use crate::error::{Error, Result};
use crate::point::ThicknessPoint;

// gtools modules
use gtools_utils::f;

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f64::consts::{LN_10, LN_2};

fn finite(quantity: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(Error::domain(quantity, f!("non-finite input {v}"))),
        None => Ok(()),
    }
}

fn positive(quantity: &'static str, name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::domain(quantity, f!("{name} must be positive, found {value}")))
    }
}

/// Signed percent difference of a simulated value from its reference
///
/// ```rust
/// # use gtools_compare::calc::percent_difference;
/// let diff = percent_difference(0.0342, 0.0828).unwrap();
/// assert!((diff + 58.70).abs() < 0.01);
///
/// assert!(percent_difference(0.0342, 0.0).is_err());
/// ```
pub fn percent_difference(simulated: f64, reference: f64) -> Result<f64> {
    finite("percent difference", &[simulated, reference])?;
    if reference == 0.0 {
        return Err(Error::domain("percent difference", "reference is zero"));
    }
    Ok(100.0 * (simulated - reference) / reference)
}

/// Ratio of a simulated value to its reference
pub fn ratio(simulated: f64, reference: f64) -> Result<f64> {
    finite("ratio", &[simulated, reference])?;
    if reference == 0.0 {
        return Err(Error::domain("ratio", "reference is zero"));
    }
    Ok(simulated / reference)
}

/// Half-value layer, ln(2)/μ
///
/// ```rust
/// # use gtools_compare::calc::{half_value_layer, tenth_value_layer};
/// let hvl = half_value_layer(0.0857).unwrap();
/// let tvl = tenth_value_layer(0.0857).unwrap();
/// assert!(hvl < tvl);
///
/// assert!(half_value_layer(0.0).is_err());
/// ```
pub fn half_value_layer(mu: f64) -> Result<f64> {
    positive("half-value layer", "μ", mu)?;
    Ok(LN_2 / mu)
}

/// Tenth-value layer, ln(10)/μ
pub fn tenth_value_layer(mu: f64) -> Result<f64> {
    positive("tenth-value layer", "μ", mu)?;
    Ok(LN_10 / mu)
}

/// Mass attenuation coefficient μ/ρ from a linear coefficient
pub fn mass_coefficient(mu: f64, density: f64) -> Result<f64> {
    finite("mass attenuation coefficient", &[mu])?;
    positive("mass attenuation coefficient", "density", density)?;
    Ok(mu / density)
}

/// Linear attenuation coefficient μ from a mass coefficient
pub fn linear_from_mass(mu_rho: f64, density: f64) -> Result<f64> {
    finite("linear attenuation coefficient", &[mu_rho])?;
    positive("linear attenuation coefficient", "density", density)?;
    Ok(mu_rho * density)
}

/// Transmission relative to the baseline material
pub fn relative_transmission(transmission: f64, baseline: f64) -> Result<f64> {
    finite("relative transmission", &[transmission])?;
    positive("relative transmission", "baseline transmission", baseline)?;
    Ok(transmission / baseline)
}

/// Beer-Lambert transmission, exp(-μx)
pub fn beer_lambert(mu: f64, thickness_cm: f64) -> f64 {
    (-mu * thickness_cm).exp()
}

/// Fraction of the beam removed, 100(1 - T)
pub fn attenuation_percent(transmission: f64) -> Result<f64> {
    finite("attenuation", &[transmission])?;
    if transmission < 0.0 {
        return Err(Error::domain(
            "attenuation",
            f!("transmission must not be negative, found {transmission}"),
        ));
    }
    Ok(100.0 * (1.0 - transmission))
}

/// Attenuation coefficient of a single slab, -ln(T)/x
///
/// Requires x > 0 and T in (0, 1].
pub fn local_coefficient(transmission: f64, thickness_cm: f64) -> Result<f64> {
    positive("local attenuation coefficient", "thickness", thickness_cm)?;
    if !(transmission > 0.0 && transmission <= 1.0) {
        return Err(Error::domain(
            "local attenuation coefficient",
            f!("transmission must be in (0, 1], found {transmission}"),
        ));
    }
    Ok(-transmission.ln() / thickness_cm)
}

/// Binomial counting uncertainty on a transmission, sqrt(T(1-T)/N)
pub fn binomial_uncertainty(transmission: f64, total: u64) -> Result<f64> {
    if total == 0 {
        return Err(Error::domain("transmission uncertainty", "no photons counted"));
    }
    if !(0.0..=1.0).contains(&transmission) {
        return Err(Error::domain(
            "transmission uncertainty",
            f!("transmission must be in [0, 1], found {transmission}"),
        ));
    }
    Ok((transmission * (1.0 - transmission) / total as f64).sqrt())
}

/// (x, ln T) for every point with a defined logarithm
fn log_points(series: &[ThicknessPoint]) -> Vec<(f64, f64, &ThicknessPoint)> {
    series
        .iter()
        .filter_map(|p| match p.ln_transmission() {
            Some(ln) => Some((p.thickness_cm, ln, p)),
            None => {
                warn!(
                    "Excluding {} cm from log-space fit, transmission {}",
                    p.thickness_cm, p.transmission
                );
                None
            }
        })
        .collect()
}

/// Coefficient of determination of ln(T) = -μx
///
/// R² = 1 - SS_res/SS_tot, with SS_res = Σ(ln Tᵢ + μxᵢ)² and SS_tot the total
/// sum of squares of ln(T) about its mean. The model has no free intercept,
/// since T = 1 with no absorber.
///
/// ```rust
/// # use gtools_compare::calc::r_squared;
/// # use gtools_compare::ThicknessPoint;
/// let mu: f64 = 0.0857;
/// let series: Vec<ThicknessPoint> = [1.0, 2.0, 5.0, 10.0]
///     .iter()
///     .map(|x| ThicknessPoint::new(*x, (-mu * x).exp(), 0.001))
///     .collect();
///
/// let r2 = r_squared(&series, mu).unwrap();
/// assert!((r2 - 1.0).abs() < 1e-12);
/// ```
pub fn r_squared(series: &[ThicknessPoint], mu: f64) -> Result<f64> {
    finite("R²", &[mu])?;
    let points = log_points(series);
    if points.is_empty() {
        return Err(Error::domain("R²", "no points with a defined ln(T)"));
    }

    let n = points.len() as f64;
    let mean = points.iter().map(|(_, y, _)| y).sum::<f64>() / n;
    let ss_tot = points.iter().map(|(_, y, _)| (y - mean).powi(2)).sum::<f64>();
    let ss_res = points.iter().map(|(x, y, _)| (y + mu * x).powi(2)).sum::<f64>();

    if ss_tot == 0.0 {
        return Err(Error::domain("R²", "ln(T) does not vary over the series"));
    }

    let r2 = 1.0 - ss_res / ss_tot;
    debug!("R² = {r2} from {} points", points.len());
    Ok(r2)
}

/// Result of a weighted Beer-Lambert fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Fitted attenuation coefficient (cm⁻¹)
    pub mu: f64,
    /// Standard error on μ (cm⁻¹)
    pub mu_error: f64,
    /// Fitted ln(T) at zero thickness
    pub intercept: f64,
    /// Number of points used
    pub points: usize,
}

/// Weighted least-squares fit of ln(T) = a - μx
///
/// Each point is weighted by (T/σ_T)², the inverse variance of ln(T). If any
/// uncertainty is missing or zero every point gets a unit weight instead, and
/// the error on μ is scaled by the scatter of the residuals.
///
/// ```rust
/// # use gtools_compare::calc::weighted_fit;
/// # use gtools_compare::ThicknessPoint;
/// let series: Vec<ThicknessPoint> = [0.5, 1.0, 2.0, 5.0, 10.0]
///     .iter()
///     .map(|x| ThicknessPoint::new(*x, (-0.0601 * x).exp(), 0.002))
///     .collect();
///
/// let fit = weighted_fit(&series).unwrap();
/// assert!((fit.mu - 0.0601).abs() < 1e-10);
/// assert!(fit.intercept.abs() < 1e-10);
/// ```
pub fn weighted_fit(series: &[ThicknessPoint]) -> Result<LinearFit> {
    let points = log_points(series);
    if points.len() < 2 {
        return Err(Error::domain(
            "Beer-Lambert fit",
            f!("at least 2 points required, found {}", points.len()),
        ));
    }

    let has_errors = points
        .iter()
        .all(|(_, _, p)| p.transmission_error > 0.0 && p.transmission_error.is_finite());
    if !has_errors {
        warn!("Missing transmission uncertainties, fitting with unit weights");
    }

    let weight = |p: &ThicknessPoint| {
        if has_errors {
            (p.transmission / p.transmission_error).powi(2)
        } else {
            1.0
        }
    };

    let (mut s, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(x, y, p) in &points {
        let w = weight(p);
        s += w;
        sx += w * x;
        sy += w * y;
        sxx += w * x * x;
        sxy += w * x * y;
    }

    let delta = s * sxx - sx * sx;
    if !(delta.abs() > 0.0) {
        return Err(Error::domain(
            "Beer-Lambert fit",
            "thicknesses do not vary over the series",
        ));
    }

    let slope = (s * sxy - sx * sy) / delta;
    let intercept = (sxx * sy - sx * sxy) / delta;
    let mut variance = s / delta;

    if !has_errors {
        let dof = points.len().saturating_sub(2).max(1) as f64;
        let chi2 = points
            .iter()
            .map(|(x, y, _)| (y - intercept - slope * x).powi(2))
            .sum::<f64>();
        variance *= chi2 / dof;
    }

    let fit = LinearFit {
        mu: -slope,
        mu_error: variance.sqrt(),
        intercept,
        points: points.len(),
    };
    debug!("Weighted fit μ = {} +/- {}", fit.mu, fit.mu_error);
    Ok(fit)
}
