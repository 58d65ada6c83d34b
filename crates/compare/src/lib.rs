//! Comparative gamma attenuation analysis
//!
//! Compares simulated photon attenuation against reference data along three
//! independent axes:
//!
//! | Axis      | Input table           | Compared                            |
//! | --------- | --------------------- | ----------------------------------- |
//! | energy    | μ/ρ at each energy    | against NIST μ/ρ                    |
//! | thickness | I/I₀ at each depth    | against the fitted Beer-Lambert law |
//! | material  | μ for each material   | against narrow-beam μ at 662 keV    |
//!
//! Data flows one way:
//!
//! 1. [schema] reads the canonical CSV tables into measurement points
//! 2. [FitResult::resolve()] settles the attenuation coefficient of a
//!    thickness scan from its fit report, configured defaults, or the series
//! 3. the `compare_*` functions build one [ComparisonRecord] per point, with
//!    derived quantities from [calc]
//! 4. a [Section] groups the records of a series with statistics and
//!    highlighted points, and a [Report] collects sections for output
//!
//! # Quickstart example
//!
//! ```rust
//! # use gtools_compare::{Analysis, AnalysisConfig, parse_material_csv};
//! let text = "Material,Mu_cm1\nWater,0.0342\nMuscle,0.0358\nBone,0.0601\n";
//! let points = parse_material_csv(text).unwrap();
//!
//! let analysis = Analysis::new(AnalysisConfig::default());
//! let section = analysis.materials(&points).unwrap();
//!
//! for record in &section.records {
//!     println!("{record}");
//! }
//! ```
//!
//! Whole studies may be run as a batch of independent [Job]s, where any job
//! that fails is skipped rather than stopping the others.
//!
//! ```rust, no_run
//! # use gtools_compare::{run_batch, Analysis, AnalysisConfig, Job};
//! let config = AnalysisConfig::from_json("config.json").unwrap();
//! let analysis = Analysis::new(config);
//!
//! let jobs = vec![Job::Thickness {
//!     table: "thickness_water.csv".into(),
//!     report: Some("fit_water_results.txt".into()),
//!     material: "water".into(),
//! }];
//!
//! let batch = run_batch(&analysis, &jobs);
//! std::fs::write("report.json", batch.report.to_json().unwrap()).unwrap();
//! ```

// Modules
mod aggregate;
mod analysis;
mod batch;
mod config;
mod error;
mod fit;
mod point;
mod record;
mod report;

pub mod calc;
pub mod schema;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use config::{AnalysisConfig, FallbackTable};

#[doc(inline)]
pub use point::{
    Axis, EnergyPoint, Key, MaterialPoint, MeasurementPoint, Slab, ThicknessPoint,
};

#[doc(inline)]
pub use fit::{FitResult, Source};

#[doc(inline)]
pub use record::ComparisonRecord;

#[doc(inline)]
pub use aggregate::{
    compare_energy, compare_materials, compare_thickness, highlight, key_points, KeyPoint,
    Tolerance,
};

#[doc(inline)]
pub use report::{Report, Section, SeriesFit, Statistics};

#[doc(inline)]
pub use schema::{
    parse_energy_csv, parse_material_csv, parse_thickness_csv, read_energy_csv,
    read_material_csv, read_thickness_csv,
};

#[doc(inline)]
pub use analysis::{Analysis, Job};

#[doc(inline)]
pub use batch::{run_batch, Batch, Skipped};
