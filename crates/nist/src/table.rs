// crate modules
use crate::data::{
    BONE_MU_RHO, CS137_ENERGY_KEV, CS137_NARROW_BEAM, MUSCLE_MU_RHO, TISSUE_ENERGY_KEV,
    WATER_ENERGY_MEV, WATER_MU_RHO,
};
use crate::error::{Error, Result};
use crate::material::Material;

// gtools modules
use gtools_utils::{f, StringExt};

// external crates
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Relative slack on table edges for energies converted between units
const EDGE_TOLERANCE: f64 = 1.0e-6;

/// Reference attenuation for one (material, energy) pair
///
/// Immutable once looked up. Both the mass and linear coefficients are kept
/// so that comparisons can be made on whichever the simulation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValue {
    /// Normalised material key
    pub material: String,
    /// Photon energy (keV)
    pub energy_kev: f64,
    /// Mass attenuation coefficient μ/ρ (cm²/g)
    pub mu_rho: f64,
    /// Linear attenuation coefficient μ (cm⁻¹)
    pub mu: f64,
}

impl ReferenceValue {
    /// Reference from a tabulated mass attenuation coefficient
    ///
    /// ```rust
    /// # use gtools_nist::{Material, ReferenceValue};
    /// let bone = ReferenceValue::from_mass(&Material::bone(), 662.0, 0.0708).unwrap();
    /// assert!((bone.mu - 0.13098).abs() < 1e-9);
    /// ```
    pub fn from_mass(material: &Material, energy_kev: f64, mu_rho: f64) -> Result<Self> {
        check_value(material, mu_rho)?;
        Ok(Self {
            material: material.key.clone(),
            energy_kev,
            mu_rho,
            mu: mu_rho * material.density,
        })
    }

    /// Reference from a linear attenuation coefficient
    ///
    /// ```rust
    /// # use gtools_nist::{Material, ReferenceValue};
    /// let water = ReferenceValue::from_linear(&Material::water(), 662.0, 0.0828).unwrap();
    /// assert_eq!(water.mu_rho, 0.0828);
    /// ```
    pub fn from_linear(material: &Material, energy_kev: f64, mu: f64) -> Result<Self> {
        check_value(material, mu)?;
        Ok(Self {
            material: material.key.clone(),
            energy_kev,
            mu_rho: mu / material.density,
            mu,
        })
    }
}

fn check_value(material: &Material, value: f64) -> Result<()> {
    let reason = if !(material.density > 0.0) {
        f!("density must be positive, found {}", material.density)
    } else if !(value.is_finite() && value > 0.0) {
        f!("attenuation coefficient must be positive, found {value}")
    } else {
        return Ok(());
    };

    Err(Error::InvalidSeries {
        material: material.key.clone(),
        reason,
    })
}

/// Tabulated μ/ρ against energy for a single material
///
/// Energies must be strictly ascending and every coefficient positive, which
/// is checked on construction. Lookups between tabulated energies use linear
/// interpolation of ln(μ/ρ) against ln(E).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSeries {
    /// Material the series describes
    pub material: Material,
    energies_kev: Vec<f64>,
    mu_rho: Vec<f64>,
}

impl ReferenceSeries {
    /// Create a new validated series
    ///
    /// ```rust
    /// # use gtools_nist::{Material, ReferenceSeries};
    /// let series = ReferenceSeries::new(Material::water(), vec![600.0, 800.0], vec![0.08956, 0.07865]);
    /// assert!(series.is_ok());
    ///
    /// // energies must ascend
    /// let series = ReferenceSeries::new(Material::water(), vec![800.0, 600.0], vec![0.07865, 0.08956]);
    /// assert!(series.is_err());
    /// ```
    pub fn new(material: Material, energies_kev: Vec<f64>, mu_rho: Vec<f64>) -> Result<Self> {
        let series = Self {
            material,
            energies_kev,
            mu_rho,
        };
        series.validate()?;
        Ok(series)
    }

    /// The NIST table for liquid water, 1 keV to 20 MeV
    pub fn nist_water() -> Self {
        Self {
            material: Material::water(),
            energies_kev: WATER_ENERGY_MEV.iter().map(|e| e * 1.0e3).collect(),
            mu_rho: WATER_MU_RHO.to_vec(),
        }
    }

    /// Tabulated μ/ρ of compact bone, 1 keV to 20 MeV
    pub fn nist_bone() -> Self {
        Self {
            material: Material::bone(),
            energies_kev: TISSUE_ENERGY_KEV.to_vec(),
            mu_rho: BONE_MU_RHO.to_vec(),
        }
    }

    /// Tabulated μ/ρ of skeletal muscle, 1 keV to 20 MeV
    pub fn nist_muscle() -> Self {
        Self {
            material: Material::muscle(),
            energies_kev: TISSUE_ENERGY_KEV.to_vec(),
            mu_rho: MUSCLE_MU_RHO.to_vec(),
        }
    }

    /// Tabulated energies (keV)
    pub fn energies(&self) -> &[f64] {
        &self.energies_kev
    }

    /// Tabulated mass attenuation coefficients (cm²/g)
    pub fn coefficients(&self) -> &[f64] {
        &self.mu_rho
    }

    /// Lowest and highest tabulated energy (keV)
    pub fn energy_range(&self) -> (f64, f64) {
        // validated series are never empty
        let min = self.energies_kev.first().copied().unwrap_or(f64::NAN);
        let max = self.energies_kev.last().copied().unwrap_or(f64::NAN);
        (min, max)
    }

    /// Mass attenuation coefficient at any energy within the table
    ///
    /// Energies outside of the tabulated range are an error rather than being
    /// clamped to the end points.
    ///
    /// ```rust
    /// # use gtools_nist::ReferenceSeries;
    /// let water = ReferenceSeries::nist_water();
    ///
    /// // tabulated values are returned as-is
    /// assert_eq!(water.mu_rho_at(1000.0).unwrap(), 7.072e-2);
    ///
    /// // the Cs-137 line falls between 600 and 800 keV
    /// let cs137 = water.mu_rho_at(662.0).unwrap();
    /// assert!(cs137 < 8.956e-2 && cs137 > 7.865e-2);
    ///
    /// assert!(water.mu_rho_at(25_000.0).is_err());
    /// ```
    pub fn mu_rho_at(&self, energy_kev: f64) -> Result<f64> {
        if !(energy_kev > 0.0) {
            return Err(Error::NonPositiveEnergy(energy_kev));
        }

        let (min, max) = self.energy_range();
        if energy_kev < min * (1.0 - EDGE_TOLERANCE) || energy_kev > max * (1.0 + EDGE_TOLERANCE) {
            return Err(Error::EnergyOutsideTable {
                material: self.material.key.clone(),
                energy: energy_kev,
                min,
                max,
            });
        }

        let e = energy_kev.clamp(min, max);
        let idx = self.energies_kev.partition_point(|&x| x < e);

        // on a tabulated energy, or the lowest edge
        if idx == 0 || self.energies_kev[idx] == e {
            return Ok(self.mu_rho[idx]);
        }

        let (x1, x2) = (self.energies_kev[idx - 1].ln(), self.energies_kev[idx].ln());
        let (y1, y2) = (self.mu_rho[idx - 1].ln(), self.mu_rho[idx].ln());
        let y = y1 + (y2 - y1) * (e.ln() - x1) / (x2 - x1);

        debug!("{} μ/ρ({e} keV) = {:.6e}", self.material.key, y.exp());
        Ok(y.exp())
    }

    /// Full [ReferenceValue] at an energy within the table
    pub fn reference_at(&self, energy_kev: f64) -> Result<ReferenceValue> {
        ReferenceValue::from_mass(&self.material, energy_kev, self.mu_rho_at(energy_kev)?)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidSeries {
            material: self.material.key.clone(),
            reason: reason.to_string(),
        };

        if self.energies_kev.is_empty() {
            return Err(invalid("no tabulated energies"));
        }
        if self.energies_kev.len() != self.mu_rho.len() {
            return Err(invalid("energy and coefficient lengths differ"));
        }
        if self.energies_kev.iter().any(|e| !(e.is_finite() && *e > 0.0)) {
            return Err(invalid("energies must be positive"));
        }
        if self.energies_kev.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("energies must be strictly ascending"));
        }
        if self.mu_rho.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(invalid("coefficients must be positive"));
        }
        if !(self.material.density > 0.0) {
            return Err(invalid("density must be positive"));
        }
        Ok(())
    }
}

/// Collection of reference series keyed by material
///
/// ```rust
/// # use gtools_nist::ReferenceTable;
/// let table = ReferenceTable::cs137();
/// let bone = table.lookup("Bone", 662.0).unwrap();
/// assert!((bone.mu - 0.1311).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    series: Vec<ReferenceSeries>,
}

impl ReferenceTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-spectrum NIST data for water, muscle, and bone
    pub fn nist() -> Self {
        Self {
            series: vec![
                ReferenceSeries::nist_water(),
                ReferenceSeries::nist_muscle(),
                ReferenceSeries::nist_bone(),
            ],
        }
    }

    /// Narrow-beam references at the 662 keV Cs-137 line
    ///
    /// Only answers lookups at 662 keV, for water, muscle, and bone.
    pub fn cs137() -> Self {
        let series = CS137_NARROW_BEAM
            .iter()
            .filter_map(|(key, mu)| {
                let material = Material::find(key)?;
                let mu_rho = mu / material.density;
                Some(ReferenceSeries {
                    material,
                    energies_kev: vec![CS137_ENERGY_KEV],
                    mu_rho: vec![mu_rho],
                })
            })
            .collect();
        Self { series }
    }

    /// Read a table previously written with [ReferenceTable::to_json()]
    ///
    /// Every series is validated after reading.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        let table: Self = serde_json::from_reader(reader)?;
        for series in &table.series {
            series.validate()?;
        }
        Ok(table)
    }

    /// Serialise the table to a pretty JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a series, replacing any existing series for the same material
    pub fn insert(&mut self, series: ReferenceSeries) {
        self.series.retain(|s| s.material.key != series.material.key);
        self.series.push(series);
    }

    /// Reference series for a material, if available
    pub fn series(&self, material: &str) -> Option<&ReferenceSeries> {
        let key = material.material_key();
        self.series.iter().find(|s| s.material.key == key)
    }

    /// Materials with reference data
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.series.iter().map(|s| &s.material)
    }

    /// Reference value for a (material, energy) pair
    pub fn lookup(&self, material: &str, energy_kev: f64) -> Result<ReferenceValue> {
        self.series(material)
            .ok_or_else(|| Error::UnknownMaterial(material.to_string()))?
            .reference_at(energy_kev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_table_is_valid() {
        assert!(ReferenceSeries::nist_water().validate().is_ok());
        assert_eq!(ReferenceSeries::nist_water().energy_range(), (1.0, 20_000.0));
        assert!(ReferenceSeries::nist_bone().validate().is_ok());
        assert!(ReferenceSeries::nist_muscle().validate().is_ok());
        assert_eq!(ReferenceSeries::nist_bone().energy_range(), (1.0, 20_000.0));
    }

    #[test]
    fn log_log_midpoint() {
        let series =
            ReferenceSeries::new(Material::water(), vec![100.0, 10_000.0], vec![1.0, 0.01]).unwrap();
        // halfway in ln(E) is halfway in ln(μ/ρ)
        let value = series.mu_rho_at(1_000.0).unwrap();
        assert!((value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn unit_conversion_on_edges() {
        let water = ReferenceSeries::nist_water();
        // 20 MeV via an inexact MeV -> keV conversion
        assert!(water.mu_rho_at(0.02 * 1.0e6 / 1.0e3).is_ok());
        assert!(water.mu_rho_at(0.0).is_err());
    }

    #[test]
    fn cs137_single_points() {
        let table = ReferenceTable::cs137();
        assert_eq!(table.materials().count(), 3);
        assert!(table.lookup("water", 662.0).is_ok());
        assert!(table.lookup("water", 700.0).is_err());
        assert!(matches!(
            table.lookup("lead", 662.0),
            Err(Error::UnknownMaterial(_))
        ));
    }

    #[test]
    fn insert_replaces() {
        let mut table = ReferenceTable::nist();
        let custom =
            ReferenceSeries::new(Material::water(), vec![662.0], vec![0.0858]).unwrap();
        table.insert(custom);
        assert_eq!(table.materials().count(), 3);
        assert_eq!(table.lookup("water", 662.0).unwrap().mu_rho, 0.0858);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ReferenceValue::from_linear(&Material::water(), 662.0, -0.1).is_err());
        assert!(ReferenceValue::from_linear(&Material::new("void", "", 0.0), 662.0, 0.1).is_err());
    }
}
