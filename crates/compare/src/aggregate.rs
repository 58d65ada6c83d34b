//! Building comparison records for each experimental axis
//!
//! Every function here produces one [ComparisonRecord] per measurement point,
//! already in ascending key order. Materials follow the designated material
//! order, with anything unknown afterwards by name.
//!
//! A quantity that can not be derived for one point is logged and left as
//! `None`. It never stops the rest of the series.

// crate modules
use crate::calc;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::fit::FitResult;
use crate::point::{EnergyPoint, MaterialPoint, MeasurementPoint, ThicknessPoint};
use crate::record::ComparisonRecord;

// gtools modules
use gtools_nist::{Material, ReferenceTable};
use gtools_utils::f;

// external crates
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How close a key has to be to a target value
///
/// Both are strict, a key exactly on the edge does not match.
///
/// ```rust
/// # use gtools_compare::Tolerance;
/// assert!(Tolerance::Absolute(1.0).contains(661.5, 662.0));
/// assert!(!Tolerance::Absolute(1.0).contains(663.0, 662.0));
///
/// // 10% of the target
/// assert!(Tolerance::Relative(0.1).contains(700.0, 662.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tolerance {
    /// Fixed window, in the units of the key
    Absolute(f64),
    /// Fraction of the target value
    Relative(f64),
}

impl Tolerance {
    /// True if `value` lies strictly within tolerance of `target`
    pub fn contains(&self, value: f64, target: f64) -> bool {
        let distance = (value - target).abs();
        match self {
            Tolerance::Absolute(window) => distance < *window,
            Tolerance::Relative(fraction) => distance < fraction * target.abs(),
        }
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Tolerance::Absolute(window) => write!(f, "±{window}"),
            Tolerance::Relative(fraction) => write!(f, "±{}%", fraction * 100.0),
        }
    }
}

/// A matched target from the key points table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    /// The requested value
    pub target: f64,
    /// First record within tolerance of the target
    pub record: ComparisonRecord,
}

/// Log a failed derivation and carry on without it
fn logged(result: Result<f64>, context: &str) -> Option<f64> {
    result.map_err(|e| warn!("{context}: {e}")).ok()
}

/// Compare simulated μ/ρ against reference μ/ρ across energies
///
/// The reference comes from the point itself when the table carried one,
/// otherwise from `references` by log-log interpolation. A percent difference
/// quoted in the table is checked against the recomputed value and replaced.
///
/// The density for μ, HVL, and TVL is that of a standard material, or
/// else the one carried by the reference series.
///
/// ```rust
/// # use gtools_compare::{compare_energy, AnalysisConfig, EnergyPoint};
/// # use gtools_nist::ReferenceTable;
/// let points = vec![EnergyPoint::new(1000.0, 0.0707), EnergyPoint::new(100.0, 0.1710)];
/// let records = compare_energy(&points, "water", &ReferenceTable::nist(), &AnalysisConfig::default());
///
/// // ascending energy
/// assert_eq!(records[0].key.value(), Some(100.0));
/// assert!(records[1].difference.unwrap().abs() < 0.1);
/// ```
pub fn compare_energy(
    points: &[EnergyPoint],
    material: &str,
    references: &ReferenceTable,
    config: &AnalysisConfig,
) -> Vec<ComparisonRecord> {
    let density = Material::find(material)
        .map(|m| m.density)
        .or_else(|| references.series(material).map(|s| s.material.density));

    points
        .iter()
        .sorted_by(|a, b| a.energy_kev.total_cmp(&b.energy_kev))
        .map(|p| {
            let mut record = ComparisonRecord::new(p.key(), p.mu_rho);
            let context = f!("{material} at {} keV", p.energy_kev);

            record.reference = match p.reference_mu_rho {
                Some(r) => Some(r),
                None => references
                    .lookup(material, p.energy_kev)
                    .map(|r| r.mu_rho)
                    .map_err(|e| warn!("{context}: {e}"))
                    .ok(),
            };

            if let Some(reference) = record.reference {
                record.difference = logged(calc::percent_difference(p.mu_rho, reference), &context);
                record.ratio = logged(calc::ratio(p.mu_rho, reference), &context);
            }

            if let (Some(quoted), Some(computed)) = (p.quoted_difference, record.difference) {
                if (quoted - computed).abs() > config.difference_tolerance {
                    warn!("{context}: quoted difference {quoted}% disagrees, using {computed}%");
                }
            }

            record.mu_rho = Some(p.mu_rho);
            record.transmission = p.transmission;
            record.density = density;
            if let Some(density) = density {
                record.mu = logged(calc::linear_from_mass(p.mu_rho, density), &context);
            }
            if let Some(mu) = record.mu {
                record.half_value_layer = logged(calc::half_value_layer(mu), &context);
                record.tenth_value_layer = logged(calc::tenth_value_layer(mu), &context);
            }

            debug!("{record}");
            record
        })
        .collect()
}

/// Compare measured transmissions against the resolved Beer-Lambert fit
///
/// The reference for each thickness is exp(-μx) with the fitted μ.
///
/// ```rust
/// # use gtools_compare::{compare_thickness, FitResult, Source, ThicknessPoint};
/// let fit = FitResult { mu: 0.0857, mu_error: 0.0012, r_squared: None, source: Source::Parsed };
/// let points = vec![ThicknessPoint::new(5.0, 0.6515, 0.002)];
///
/// let records = compare_thickness(&points, &fit);
/// assert!(records[0].difference.unwrap().abs() < 0.05);
/// assert!((records[0].local_mu.unwrap() - 0.0857).abs() < 1e-4);
/// ```
pub fn compare_thickness(points: &[ThicknessPoint], fit: &FitResult) -> Vec<ComparisonRecord> {
    points
        .iter()
        .sorted_by(|a, b| a.thickness_cm.total_cmp(&b.thickness_cm))
        .map(|p| {
            let predicted = fit.transmission(p.thickness_cm);
            let context = f!("{} cm", p.thickness_cm);

            let mut record = ComparisonRecord::new(p.key(), p.transmission);
            record.reference = Some(predicted);
            record.difference =
                logged(calc::percent_difference(p.transmission, predicted), &context);
            record.ratio = logged(calc::ratio(p.transmission, predicted), &context);

            record.transmission = Some(p.transmission);
            record.transmission_error = Some(p.transmission_error);
            record.ln_transmission = p.ln_transmission();
            record.attenuation_percent =
                logged(calc::attenuation_percent(p.transmission), &context);

            // nothing to attenuate at zero thickness
            if p.thickness_cm > 0.0 {
                record.local_mu =
                    logged(calc::local_coefficient(p.transmission, p.thickness_cm), &context);
            }

            debug!("{record}");
            record
        })
        .collect()
}

/// Compare simulated μ against reference μ across materials
///
/// Relative transmissions are normalised by the transmission of the baseline
/// material, the first in the designated order. Without a baseline point they
/// are left as `None`.
///
/// ```rust
/// # use gtools_compare::{compare_materials, AnalysisConfig, MaterialPoint};
/// # use gtools_nist::ReferenceTable;
/// let points = vec![MaterialPoint::new("bone", 0.0601), MaterialPoint::new("water", 0.0342)];
/// let records = compare_materials(&points, &ReferenceTable::cs137(), &AnalysisConfig::default());
///
/// // water first, it is the baseline
/// assert_eq!(records[0].key.to_string(), "water");
/// assert!((records[0].difference.unwrap() + 58.70).abs() < 0.01);
/// ```
pub fn compare_materials(
    points: &[MaterialPoint],
    references: &ReferenceTable,
    config: &AnalysisConfig,
) -> Vec<ComparisonRecord> {
    let baseline = config
        .baseline()
        .and_then(|b| points.iter().find(|p| p.material == b))
        .and_then(|p| p.transmission);

    if baseline.is_none() && points.iter().any(|p| p.transmission.is_some()) {
        warn!("No baseline transmission, relative transmissions unavailable");
    }

    points
        .iter()
        .sorted_by_key(|p| {
            (
                config.material_rank(&p.material).unwrap_or(usize::MAX),
                p.material.clone(),
            )
        })
        .map(|p| {
            let context = p.material.clone();
            let mut record = ComparisonRecord::new(p.key(), p.mu);

            record.reference = references
                .lookup(&p.material, config.beam_energy_kev)
                .map(|r| r.mu)
                .map_err(|e| warn!("{context}: {e}"))
                .ok();

            if let Some(reference) = record.reference {
                record.difference = logged(calc::percent_difference(p.mu, reference), &context);
                record.ratio = logged(calc::ratio(p.mu, reference), &context);
            }

            record.mu = Some(p.mu);
            record.density = p
                .density
                .or_else(|| Material::find(&p.material).map(|m| m.density));
            if let Some(density) = record.density {
                record.mu_rho = logged(calc::mass_coefficient(p.mu, density), &context);
            }
            record.half_value_layer = logged(calc::half_value_layer(p.mu), &context);
            record.tenth_value_layer = logged(calc::tenth_value_layer(p.mu), &context);

            record.transmission = p.transmission;
            record.transmission_error = p.transmission_error();
            if let Some(t) = p.transmission {
                record.attenuation_percent = logged(calc::attenuation_percent(t), &context);
                if let Some(b) = baseline {
                    record.relative_transmission =
                        logged(calc::relative_transmission(t, b), &context);
                }
            }

            debug!("{record}");
            record
        })
        .collect()
}

/// First record, in ascending key order, within tolerance of a target
///
/// No match is not an error, there is simply nothing to highlight.
///
/// ```rust
/// # use gtools_compare::{highlight, ComparisonRecord, Key, Tolerance};
/// let records: Vec<ComparisonRecord> = [10.0, 100.0, 661.5, 1000.0]
///     .iter()
///     .map(|e| ComparisonRecord::new(Key::Energy(*e), 0.08))
///     .collect();
///
/// let tolerance = Tolerance::Absolute(1.0);
/// assert_eq!(highlight(&records, 662.0, tolerance).unwrap().key, Key::Energy(661.5));
/// assert!(highlight(&records, 700.0, tolerance).is_none());
/// ```
pub fn highlight(
    records: &[ComparisonRecord],
    target: f64,
    tolerance: Tolerance,
) -> Option<&ComparisonRecord> {
    records
        .iter()
        .filter_map(|r| r.key.value().map(|v| (v, r)))
        .filter(|(v, _)| tolerance.contains(*v, target))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, r)| r)
}

/// One [KeyPoint] for every target with a matching record
pub fn key_points(
    records: &[ComparisonRecord],
    targets: &[f64],
    tolerance: Tolerance,
) -> Vec<KeyPoint> {
    targets
        .iter()
        .filter_map(|target| {
            highlight(records, *target, tolerance).map(|r| KeyPoint {
                target: *target,
                record: r.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::Source;
    use crate::point::Key;
    use gtools_nist::ReferenceSeries;

    fn energies(values: &[f64]) -> Vec<ComparisonRecord> {
        values
            .iter()
            .map(|e| ComparisonRecord::new(Key::Energy(*e), 0.1))
            .collect()
    }

    #[test]
    fn strict_tolerance() {
        let tolerance = Tolerance::Absolute(1.0);
        assert!(!tolerance.contains(663.0, 662.0));
        assert!(!tolerance.contains(661.0, 662.0));
        assert!(tolerance.contains(662.999, 662.0));
    }

    #[test]
    fn relative_tolerance() {
        let records = energies(&[10.0, 100.0, 700.0]);
        assert!(highlight(&records, 662.0, Tolerance::Absolute(1.0)).is_none());
        assert_eq!(
            highlight(&records, 662.0, Tolerance::Relative(0.1)).map(|r| r.key.clone()),
            Some(Key::Energy(700.0))
        );
    }

    #[test]
    fn first_match_in_key_order() {
        // unsorted on purpose
        let records = energies(&[662.5, 661.5, 1000.0]);
        let found = highlight(&records, 662.0, Tolerance::Absolute(1.0)).unwrap();
        assert_eq!(found.key, Key::Energy(661.5));
    }

    #[test]
    fn key_point_table() {
        let records = energies(&[10.0, 100.0, 661.5, 1000.0, 1500.0]);
        let points = key_points(
            &records,
            &[10.0, 100.0, 662.0, 1000.0, 10000.0],
            Tolerance::Absolute(1.0),
        );
        let targets: Vec<f64> = points.iter().map(|p| p.target).collect();
        assert_eq!(targets, vec![10.0, 100.0, 662.0, 1000.0]);
    }

    #[test]
    fn unknown_materials_last() {
        let points = vec![
            MaterialPoint::new("lead", 1.2),
            MaterialPoint::new("bone", 0.0601),
            MaterialPoint::new("air", 0.0001),
            MaterialPoint::new("water", 0.0342),
        ];
        let records =
            compare_materials(&points, &ReferenceTable::cs137(), &AnalysisConfig::default());
        let order: Vec<String> = records.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(order, vec!["water", "bone", "air", "lead"]);

        // no reference, no difference
        assert_eq!(records[3].reference, None);
        assert_eq!(records[3].difference, None);
        assert!(records[3].half_value_layer.is_some());
    }

    #[test]
    fn relative_to_baseline() {
        let mut water = MaterialPoint::new("water", 0.0342);
        water.transmission = Some(0.8);
        let mut bone = MaterialPoint::new("bone", 0.0601);
        bone.transmission = Some(0.6);

        let records = compare_materials(
            &[bone, water],
            &ReferenceTable::cs137(),
            &AnalysisConfig::default(),
        );
        assert_eq!(records[0].relative_transmission, Some(1.0));
        assert_eq!(records[1].relative_transmission, Some(0.6 / 0.8));
        assert!((records[1].attenuation_percent.unwrap() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn no_baseline() {
        let mut bone = MaterialPoint::new("bone", 0.0601);
        bone.transmission = Some(0.6);
        let records =
            compare_materials(&[bone], &ReferenceTable::cs137(), &AnalysisConfig::default());
        assert_eq!(records[0].relative_transmission, None);
    }

    #[test]
    fn energy_reference_from_table_column() {
        let mut point = EnergyPoint::new(662.0, 0.0342);
        point.reference_mu_rho = Some(0.0828);
        point.quoted_difference = Some(-12.0);

        let records = compare_energy(
            &[point],
            "water",
            &ReferenceTable::new(),
            &AnalysisConfig::default(),
        );
        // quoted value is ignored
        assert!((records[0].difference.unwrap() + 58.70).abs() < 0.01);
        assert_eq!(records[0].mu, Some(0.0342));
    }

    #[test]
    fn energy_density_from_reference_series() {
        let pmma = Material::new("pmma", "Acrylic (PMMA)", 1.19);
        let series = ReferenceSeries::new(pmma, vec![600.0, 800.0], vec![0.08732, 0.07668]);
        let mut table = ReferenceTable::new();
        table.insert(series.unwrap());

        let records = compare_energy(
            &[EnergyPoint::new(662.0, 0.0840)],
            "PMMA",
            &table,
            &AnalysisConfig::default(),
        );
        assert_eq!(records[0].density, Some(1.19));
        assert!((records[0].mu.unwrap() - 0.0840 * 1.19).abs() < 1e-12);
        assert!(records[0].half_value_layer.is_some());
        assert!(records[0].tenth_value_layer.is_some());
    }

    #[test]
    fn energy_outside_reference() {
        let records = compare_energy(
            &[EnergyPoint::new(50_000.0, 0.01)],
            "water",
            &ReferenceTable::nist(),
            &AnalysisConfig::default(),
        );
        assert_eq!(records[0].reference, None);
        assert_eq!(records[0].difference, None);
    }

    #[test]
    fn thickness_against_fit() {
        let fit = FitResult {
            mu: 0.1,
            mu_error: 0.001,
            r_squared: Some(0.999),
            source: Source::Parsed,
        };
        let points = vec![
            ThicknessPoint::new(2.0, (-0.2f64).exp(), 0.001),
            ThicknessPoint::new(0.0, 1.0, 0.0),
        ];
        let records = compare_thickness(&points, &fit);

        assert_eq!(records[0].key, Key::Thickness(0.0));
        assert_eq!(records[0].local_mu, None);
        assert_eq!(records[0].difference, Some(0.0));
        assert!(records[1].difference.unwrap().abs() < 1e-10);
        assert!((records[1].ln_transmission.unwrap() + 0.2).abs() < 1e-12);
    }
}
