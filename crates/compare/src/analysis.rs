// crate modules
use crate::aggregate::{compare_energy, compare_materials, compare_thickness};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::fit::FitResult;
use crate::point::{Axis, EnergyPoint, MaterialPoint, Slab, ThicknessPoint};
use crate::report::{SeriesFit, Section};
use crate::schema::{read_energy_csv, read_material_csv, read_thickness_csv};

// gtools modules
use gtools_fit::{read_fit_report, FitReport};
use gtools_nist::{Material, ReferenceTable};
use gtools_utils::{f, StringExt};

// external crates
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One independent analysis and its inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Job {
    /// Simulated μ/ρ over a range of photon energies
    Energy {
        /// Input CSV table
        table: PathBuf,
        /// Material of the scan
        material: String,
    },
    /// Transmission through a range of thicknesses, with an optional fit report
    Thickness {
        table: PathBuf,
        report: Option<PathBuf>,
        material: String,
    },
    /// Simulated μ for several materials at the beam energy
    Material { table: PathBuf },
}

impl Job {
    /// Short description for logging
    pub fn name(&self) -> String {
        match self {
            Job::Energy { material, .. } => f!("{} energy scan", material.material_key()),
            Job::Thickness { material, .. } => f!("{} thickness scan", material.material_key()),
            Job::Material { .. } => "material comparison".to_string(),
        }
    }
}

/// Configuration and reference data shared by every analysis
///
/// Energy scans are compared against the `spectrum` table, by interpolation
/// where needed. Material and thickness studies at the beam energy use the
/// `line` table, falling back to the `spectrum` table.
///
/// ```rust
/// # use gtools_compare::{Analysis, AnalysisConfig, MaterialPoint};
/// let analysis = Analysis::new(AnalysisConfig::default());
///
/// let points = vec![
///     MaterialPoint::new("water", 0.0342),
///     MaterialPoint::new("muscle", 0.0358),
///     MaterialPoint::new("bone", 0.0601),
/// ];
///
/// let section = analysis.materials(&points).unwrap();
/// let mean = section.statistics.mean.unwrap();
/// assert!((mean + 55.7).abs() < 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Tolerances, targets and fallback coefficients
    pub config: AnalysisConfig,
    /// Reference μ/ρ over a range of energies
    pub spectrum: ReferenceTable,
    /// Reference μ at the beam energy
    pub line: ReferenceTable,
}

impl Analysis {
    /// Analysis with the built-in NIST and Cs-137 reference data
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            spectrum: ReferenceTable::nist(),
            line: ReferenceTable::cs137(),
        }
    }

    /// Analysis with custom reference data
    pub fn with_references(
        config: AnalysisConfig,
        spectrum: ReferenceTable,
        line: ReferenceTable,
    ) -> Self {
        Self {
            config,
            spectrum,
            line,
        }
    }

    /// Analysis with the energy scan references read from a JSON table
    ///
    /// ```rust, no_run
    /// # use gtools_compare::{Analysis, AnalysisConfig};
    /// let analysis =
    ///     Analysis::with_spectrum_file(AnalysisConfig::default(), "pmma_reference.json").unwrap();
    /// ```
    pub fn with_spectrum_file<P: AsRef<Path>>(config: AnalysisConfig, path: P) -> Result<Self> {
        let spectrum = ReferenceTable::from_json(path)?;
        Ok(Self::with_references(config, spectrum, ReferenceTable::cs137()))
    }

    /// Slab of the energy scan simulations for a material
    ///
    /// The thickness is configured, the density is that of a standard
    /// material or else the one carried by the reference spectrum.
    ///
    /// ```rust
    /// # use gtools_compare::{Analysis, AnalysisConfig};
    /// let analysis = Analysis::new(AnalysisConfig::default());
    /// let bone = analysis.slab("Bone").unwrap();
    /// assert_eq!((bone.thickness_cm, bone.density), (5.0, 1.85));
    ///
    /// assert!(analysis.slab("lead").is_none());
    /// ```
    pub fn slab(&self, material: &str) -> Option<Slab> {
        let density = Material::find(material)
            .map(|m| m.density)
            .or_else(|| self.spectrum.series(material).map(|s| s.material.density))?;
        Some(Slab::new(self.config.slab_thickness_cm, density))
    }

    /// Compare an energy scan against the reference spectrum
    pub fn energy(&self, points: &[EnergyPoint], material: &str) -> Result<Section> {
        let records = compare_energy(points, material, &self.spectrum, &self.config);
        Section::new(Axis::Energy, &material.material_key(), records, &self.config)
    }

    /// Compare a thickness scan against its resolved Beer-Lambert fit
    ///
    /// The fitted μ is also compared against the reference at the beam
    /// energy.
    pub fn thickness(
        &self,
        points: &[ThicknessPoint],
        report: &FitReport,
        material: &str,
    ) -> Result<Section> {
        let fit = FitResult::resolve(report, material, points, &self.config.fallback)?;
        let records = compare_thickness(points, &fit);

        let energy = self.config.beam_energy_kev;
        let reference = self
            .line
            .lookup(material, energy)
            .or_else(|_| self.spectrum.lookup(material, energy))
            .map(|r| r.mu)
            .map_err(|e| warn!("No reference for {material} fit: {e}"))
            .ok();

        let section = Section::new(Axis::Thickness, &material.material_key(), records, &self.config)?;
        Ok(section.with_fit(SeriesFit::new(material, fit, reference)))
    }

    /// Compare several materials at the beam energy
    pub fn materials(&self, points: &[MaterialPoint]) -> Result<Section> {
        let records = compare_materials(points, &self.line, &self.config);
        Section::new(Axis::Material, "materials", records, &self.config)
    }

    /// Read the inputs of a job and run it
    ///
    /// A missing table fails the job. A missing fit report does not, it is
    /// treated as empty.
    pub fn run(&self, job: &Job) -> Result<Section> {
        info!("Running {}", job.name());
        match job {
            Job::Energy { table, material } => {
                let slab = self.slab(material);
                let points = read_energy_csv(table, slab.as_ref())?;
                self.energy(&points, material)
            }
            Job::Thickness {
                table,
                report,
                material,
            } => {
                let points = read_thickness_csv(table)?;
                let report = match report {
                    Some(path) => read_fit_report(path),
                    None => FitReport::default(),
                };
                self.thickness(&points, &report, material)
            }
            Job::Material { table } => {
                let points = read_material_csv(table)?;
                self.materials(&points)
            }
        }
    }
}
