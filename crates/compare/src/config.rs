// crate modules
use crate::aggregate::Tolerance;
use crate::error::Result;

// gtools modules
use gtools_fit::Measurement;
use gtools_nist::CS137_ENERGY_KEV;
use gtools_utils::StringExt;

// external crates
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default attenuation coefficients per material
///
/// The only place fallback constants live. When a fit report gives no usable
/// coefficient the caller decides whether to use one of these, and the
/// resulting fit is always marked as a default.
///
/// ```rust
/// # use gtools_compare::FallbackTable;
/// # use gtools_fit::Measurement;
/// let mut table = FallbackTable::default();
/// assert_eq!(table.get("Water"), Some(Measurement::new(0.0430, 0.0002)));
///
/// // anything may be overridden or added
/// table.insert("PMMA", Measurement::new(0.0960, 0.0010));
/// assert!(table.get("pmma").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackTable {
    entries: BTreeMap<String, Measurement>,
}

impl FallbackTable {
    /// An empty table, so that nothing ever falls back to a default
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Default μ ± σ (cm⁻¹) for a material
    pub fn get(&self, material: &str) -> Option<Measurement> {
        self.entries.get(&material.material_key()).copied()
    }

    /// Add or replace the default for a material
    pub fn insert(&mut self, material: &str, coefficient: Measurement) {
        self.entries.insert(material.material_key(), coefficient);
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("water", Measurement::new(0.0430, 0.0002));
        table.insert("muscle", Measurement::new(0.0857, 0.002));
        table.insert("bone", Measurement::new(0.0601, 0.0002));
        table
    }
}

/// Settings shared by every analysis
///
/// `Default` gives the constants of the Cs-137 shielding study. Any field
/// missing from a JSON file keeps its default value.
///
/// ```rust
/// # use gtools_compare::{AnalysisConfig, Tolerance};
/// let config = AnalysisConfig::default();
/// assert_eq!(config.target_energy_kev, 662.0);
/// assert_eq!(config.tolerance, Tolerance::Absolute(1.0));
/// assert_eq!(config.material_order[0], "water");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Default coefficients for when a fit report has none
    pub fallback: FallbackTable,
    /// Designated material order, the first entry is the baseline
    pub material_order: Vec<String>,
    /// Energy of the highlighted key point (keV)
    pub target_energy_kev: f64,
    /// How close a key must be to a target to match
    pub tolerance: Tolerance,
    /// Representative energies for the key points table (keV)
    pub key_energies_kev: Vec<f64>,
    /// Slab thickness used to derive μ from a transmission (cm)
    pub slab_thickness_cm: f64,
    /// Beam energy of the thickness and material studies (keV)
    pub beam_energy_kev: f64,
    /// Largest accepted disagreement with a quoted percent difference
    pub difference_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackTable::default(),
            material_order: vec!["water".into(), "muscle".into(), "bone".into()],
            target_energy_kev: CS137_ENERGY_KEV,
            tolerance: Tolerance::Absolute(1.0),
            key_energies_kev: vec![10.0, 100.0, 662.0, 1000.0, 10000.0],
            slab_thickness_cm: 5.0,
            beam_energy_kev: CS137_ENERGY_KEV,
            difference_tolerance: 0.01,
        }
    }
}

impl AnalysisConfig {
    /// Read a configuration from a JSON file
    ///
    /// ```rust, no_run
    /// # use gtools_compare::AnalysisConfig;
    /// let config = AnalysisConfig::from_json("path/to/config.json").unwrap();
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialise the configuration to a pretty JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Position of a material in the designated order, if it has one
    pub fn material_rank(&self, material: &str) -> Option<usize> {
        let key = material.material_key();
        self.material_order
            .iter()
            .position(|m| m.material_key() == key)
    }

    /// The baseline material for relative comparisons
    pub fn baseline(&self) -> Option<String> {
        self.material_order.first().map(|m| m.material_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"target_energy_kev": 700.0, "tolerance": {"Relative": 0.1}}"#)
                .unwrap();
        assert_eq!(config.target_energy_kev, 700.0);
        assert_eq!(config.tolerance, Tolerance::Relative(0.1));
        assert_eq!(config.slab_thickness_cm, 5.0);
        assert_eq!(config.fallback, FallbackTable::default());
    }

    #[test]
    fn fallback_overrides() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"fallback": {"water": {"value": 0.05, "uncertainty": 0.001}}}"#)
                .unwrap();
        assert_eq!(config.fallback.get("water"), Some(Measurement::new(0.05, 0.001)));
        assert_eq!(config.fallback.get("bone"), None);
    }

    #[test]
    fn material_ranks() {
        let config = AnalysisConfig::default();
        assert_eq!(config.material_rank("Bone"), Some(2));
        assert_eq!(config.material_rank("lead"), None);
        assert_eq!(config.baseline(), Some("water".to_string()));
    }
}
