//! Canonical CSV tables written by the simulation
//!
//! Each table is validated against its column contract on ingestion. A
//! missing required column is an [Error::MissingColumn]; extra columns are
//! ignored.
//!
//! | Table     | Required                                                        | Optional                                                    |
//! | --------- | --------------------------------------------------------------- | ----------------------------------------------------------- |
//! | thickness | `Thickness_cm`, `Transmission_I_I0`, `Transmission_Error`       | `Ln_Transmission`                                           |
//! | energy    | `Energy_keV` or `Energy_MeV`                                    | `MuRho_NIST_cm2g`, `Difference_percent`                     |
//! |           | `MuRho_GEANT4_cm2g` or `Transmission_I_I0`                      |                                                             |
//! | material  | `Material`, `Mu_cm1`                                            | `Transmission_I_I0`, `Density_gcm3`, `Transmitted`, `Total` |
//!
//! Rows with a malformed or empty value in a required column are logged and
//! skipped, the rest of the table is still used.

// crate modules
use crate::error::{Error, Result};
use crate::point::{EnergyPoint, MaterialPoint, Slab, ThicknessPoint};

// external crates
use csv::{Reader, StringRecord};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const THICKNESS_COLUMNS: &[&[&str]] = &[
    &["Thickness_cm"],
    &["Transmission_I_I0"],
    &["Transmission_Error"],
];

const ENERGY_COLUMNS: &[&[&str]] = &[
    &["Energy_keV", "Energy_MeV"],
    &["MuRho_GEANT4_cm2g", "Transmission_I_I0"],
];

const MATERIAL_COLUMNS: &[&[&str]] = &[&["Material"], &["Mu_cm1"]];

#[derive(Debug, Deserialize)]
struct ThicknessRow {
    #[serde(rename = "Thickness_cm", default, deserialize_with = "csv::invalid_option")]
    thickness: Option<f64>,

    #[serde(rename = "Transmission_I_I0", default, deserialize_with = "csv::invalid_option")]
    transmission: Option<f64>,

    #[serde(rename = "Transmission_Error", default, deserialize_with = "csv::invalid_option")]
    error: Option<f64>,

    #[serde(rename = "Ln_Transmission", default, deserialize_with = "csv::invalid_option")]
    ln_transmission: Option<f64>,
}

impl ThicknessRow {
    fn into_point(self) -> Option<ThicknessPoint> {
        Some(ThicknessPoint {
            thickness_cm: self.thickness?,
            transmission: self.transmission?,
            transmission_error: self.error?,
            ln_transmission: self.ln_transmission,
        })
    }
}

#[derive(Debug, Deserialize)]
struct EnergyRow {
    #[serde(rename = "Energy_keV", default, deserialize_with = "csv::invalid_option")]
    energy_kev: Option<f64>,

    #[serde(rename = "Energy_MeV", default, deserialize_with = "csv::invalid_option")]
    energy_mev: Option<f64>,

    #[serde(rename = "MuRho_GEANT4_cm2g", default, deserialize_with = "csv::invalid_option")]
    mu_rho: Option<f64>,

    #[serde(rename = "Transmission_I_I0", default, deserialize_with = "csv::invalid_option")]
    transmission: Option<f64>,

    #[serde(rename = "MuRho_NIST_cm2g", default, deserialize_with = "csv::invalid_option")]
    reference_mu_rho: Option<f64>,

    #[serde(rename = "Difference_percent", default, deserialize_with = "csv::invalid_option")]
    difference: Option<f64>,
}

impl EnergyRow {
    /// A simulated μ/ρ is used as is, otherwise it is derived from the
    /// transmission through the slab
    fn into_point(self, slab: Option<&Slab>) -> Option<EnergyPoint> {
        let energy_kev = self.energy_kev.or(self.energy_mev.map(|e| e * 1.0e3))?;

        let mut point = match (self.mu_rho, self.transmission, slab) {
            (Some(mu_rho), transmission, _) => EnergyPoint {
                transmission,
                ..EnergyPoint::new(energy_kev, mu_rho)
            },
            (None, Some(t), Some(slab)) => EnergyPoint::from_transmission(energy_kev, t, slab)
                .map_err(|e| warn!("{energy_kev} keV: {e}"))
                .ok()?,
            (None, Some(_), None) => {
                warn!("{energy_kev} keV: transmission only, but no slab to derive μ/ρ");
                return None;
            }
            (None, None, _) => return None,
        };

        point.reference_mu_rho = self.reference_mu_rho;
        point.quoted_difference = self.difference;
        Some(point)
    }
}

#[derive(Debug, Deserialize)]
struct MaterialRow {
    #[serde(rename = "Material", default)]
    material: String,

    #[serde(rename = "Mu_cm1", default, deserialize_with = "csv::invalid_option")]
    mu: Option<f64>,

    #[serde(rename = "Transmission_I_I0", default, deserialize_with = "csv::invalid_option")]
    transmission: Option<f64>,

    #[serde(rename = "Density_gcm3", default, deserialize_with = "csv::invalid_option")]
    density: Option<f64>,

    #[serde(rename = "Transmitted", default, deserialize_with = "csv::invalid_option")]
    transmitted: Option<u64>,

    #[serde(rename = "Total", default, deserialize_with = "csv::invalid_option")]
    total: Option<u64>,
}

impl MaterialRow {
    fn into_point(self) -> Option<MaterialPoint> {
        if self.material.trim().is_empty() {
            return None;
        }

        // counts are enough to recover the transmission
        let counted = match (self.transmitted, self.total) {
            (Some(n), Some(total)) if total > 0 => Some(n as f64 / total as f64),
            _ => None,
        };

        let mut point = MaterialPoint::new(&self.material, self.mu?);
        point.transmission = self.transmission.or(counted);
        point.density = self.density;
        point.transmitted = self.transmitted;
        point.total = self.total;
        Some(point)
    }
}

/// Read the thickness scan table
///
/// ```rust, no_run
/// # use gtools_compare::read_thickness_csv;
/// let points = read_thickness_csv("path/to/thickness_water.csv").unwrap();
/// ```
pub fn read_thickness_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ThicknessPoint>> {
    let path = path.as_ref();
    let rows: Vec<ThicknessRow> = load(open(path)?, &path.display().to_string(), THICKNESS_COLUMNS)?;
    Ok(points(rows, ThicknessRow::into_point, path.display()))
}

/// Read the energy scan table
///
/// Energies given in MeV are converted to keV. Rows with only a
/// transmission need the `slab` it was simulated through, and are skipped
/// without one.
pub fn read_energy_csv<P: AsRef<Path>>(path: P, slab: Option<&Slab>) -> Result<Vec<EnergyPoint>> {
    let path = path.as_ref();
    let rows: Vec<EnergyRow> = load(open(path)?, &path.display().to_string(), ENERGY_COLUMNS)?;
    Ok(points(rows, |r| r.into_point(slab), path.display()))
}

/// Read the material comparison table
///
/// Without a `Transmission_I_I0` value the transmission is taken from the
/// `Transmitted`/`Total` counts where available.
pub fn read_material_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MaterialPoint>> {
    let path = path.as_ref();
    let rows: Vec<MaterialRow> = load(open(path)?, &path.display().to_string(), MATERIAL_COLUMNS)?;
    Ok(points(rows, MaterialRow::into_point, path.display()))
}

/// Parse thickness scan CSV text
///
/// ```rust
/// # use gtools_compare::parse_thickness_csv;
/// let text = "Thickness_cm,Transmission_I_I0,Transmission_Error\n1.0,0.918,0.001\n";
/// let points = parse_thickness_csv(text).unwrap();
/// assert_eq!(points[0].transmission, 0.918);
///
/// // missing uncertainty column
/// assert!(parse_thickness_csv("Thickness_cm,Transmission_I_I0\n1.0,0.918\n").is_err());
/// ```
pub fn parse_thickness_csv(text: &str) -> Result<Vec<ThicknessPoint>> {
    let rows: Vec<ThicknessRow> = load(text.as_bytes(), "text", THICKNESS_COLUMNS)?;
    Ok(points(rows, ThicknessRow::into_point, "text"))
}

/// Parse energy scan CSV text
///
/// ```rust
/// # use gtools_compare::parse_energy_csv;
/// let text = "Energy_MeV,MuRho_GEANT4_cm2g\n1.25,0.0630\n";
/// let points = parse_energy_csv(text, None).unwrap();
/// assert_eq!(points[0].energy_kev, 1250.0);
/// ```
pub fn parse_energy_csv(text: &str, slab: Option<&Slab>) -> Result<Vec<EnergyPoint>> {
    let rows: Vec<EnergyRow> = load(text.as_bytes(), "text", ENERGY_COLUMNS)?;
    Ok(points(rows, |r| r.into_point(slab), "text"))
}

/// Parse material comparison CSV text
pub fn parse_material_csv(text: &str) -> Result<Vec<MaterialPoint>> {
    let rows: Vec<MaterialRow> = load(text.as_bytes(), "text", MATERIAL_COLUMNS)?;
    Ok(points(rows, MaterialRow::into_point, "text"))
}

/// Open a required input, failing with [Error::MissingInput] if absent
fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(Error::MissingInput {
            path: path.display().to_string(),
        });
    }
    info!("Reading {}", path.display());
    Ok(File::open(path)?)
}

fn csv_reader<R: Read>(reader: R) -> Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Every group of alternatives needs at least one matching header
fn check_columns(headers: &StringRecord, required: &[&[&str]], source: &str) -> Result<()> {
    for alternatives in required {
        if !alternatives.iter().any(|c| headers.iter().any(|h| h == *c)) {
            return Err(Error::MissingColumn {
                column: alternatives.join(" or "),
                path: source.to_string(),
            });
        }
    }
    Ok(())
}

fn load<T, R>(reader: R, source: &str, required: &[&[&str]]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    check_columns(&headers, required, source)?;

    let mut rows = Vec::new();
    for (i, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(row) => rows.push(row),
            Err(e) => warn!("{source}: skipping row {}, {e}", i + 1),
        }
    }
    Ok(rows)
}

fn points<R, T, F, S>(rows: Vec<R>, convert: F, source: S) -> Vec<T>
where
    F: FnMut(R) -> Option<T>,
    S: std::fmt::Display,
{
    let total = rows.len();
    let points: Vec<T> = rows.into_iter().filter_map(convert).collect();
    if points.len() < total {
        warn!(
            "{source}: skipped {} of {total} rows with missing or malformed values",
            total - points.len()
        );
    }
    points
}
