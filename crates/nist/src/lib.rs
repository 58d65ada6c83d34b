//! Reference photon attenuation data
//!
//! Simulated attenuation coefficients are only meaningful next to an agreed
//! reference. This crate provides two built-in sets:
//!
//! - [ReferenceTable::nist()] for NIST mass attenuation tables of liquid
//!   water, skeletal muscle, and compact bone, 1 keV to 20 MeV
//! - [ReferenceTable::cs137()] for narrow-beam linear coefficients of water,
//!   skeletal muscle, and compact bone at the 662 keV Cs-137 line
//!
//! Lookups are always by (material, energy). Energies between tabulated
//! points are interpolated linearly in log-log space, and energies outside of
//! a table are an error rather than being silently clamped.
//!
//! # Quickstart example
//!
//! ```rust
//! # use gtools_nist::{Material, ReferenceTable};
//! let nist = ReferenceTable::nist();
//!
//! // Mass attenuation coefficient of water at 1 MeV
//! let water = nist.lookup("Water", 1000.0).unwrap();
//! assert_eq!(water.mu_rho, 7.072e-2);
//!
//! // Linear coefficient follows from the density
//! assert_eq!(water.mu, water.mu_rho * Material::water().density);
//! ```
//!
//! Custom tables may be built from [ReferenceSeries] or read from JSON.
//!
//! ```rust, no_run
//! # use gtools_nist::ReferenceTable;
//! let table = ReferenceTable::from_json("path/to/reference.json").unwrap();
//! let bone = table.lookup("bone", 662.0).unwrap();
//! ```

mod data;
mod error;
mod material;
mod table;

#[doc(inline)]
pub use data::CS137_ENERGY_KEV;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use material::Material;

#[doc(inline)]
pub use table::{ReferenceSeries, ReferenceTable, ReferenceValue};
