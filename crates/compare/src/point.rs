// crate modules
use crate::calc;
use crate::error::Result;

// gtools modules
use gtools_utils::StringExt;

// external crates
use serde::{Deserialize, Serialize};

/// Independent variable of a measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Key {
    /// Photon energy (keV)
    Energy(f64),
    /// Absorber thickness (cm)
    Thickness(f64),
    /// Normalised material key
    Material(String),
}

impl Key {
    /// Numeric value of the key, `None` for materials
    pub fn value(&self) -> Option<f64> {
        match self {
            Key::Energy(v) | Key::Thickness(v) => Some(*v),
            Key::Material(_) => None,
        }
    }

    /// Axis the key belongs to
    pub fn axis(&self) -> Axis {
        match self {
            Key::Energy(_) => Axis::Energy,
            Key::Thickness(_) => Axis::Thickness,
            Key::Material(_) => Axis::Material,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Key::Energy(e) => write!(f, "{e} keV"),
            Key::Thickness(x) => write!(f, "{x} cm"),
            Key::Material(m) => write!(f, "{m}"),
        }
    }
}

/// The three independent experimental axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    Energy,
    Thickness,
    Material,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Axis::Energy => "energy",
            Axis::Thickness => "thickness",
            Axis::Material => "material",
        };
        write!(f, "{s}")
    }
}

/// Common interface to one observation on any axis
pub trait MeasurementPoint {
    /// Independent variable
    fn key(&self) -> Key;

    /// Measured transmission or attenuation coefficient
    fn value(&self) -> f64;

    /// Uncertainty on [MeasurementPoint::value()], if known
    fn uncertainty(&self) -> Option<f64>;
}

/// Transmission through one absorber thickness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThicknessPoint {
    /// Absorber thickness (cm)
    pub thickness_cm: f64,
    /// Measured I/I₀
    pub transmission: f64,
    /// Absolute uncertainty on I/I₀
    pub transmission_error: f64,
    /// ln(I/I₀) as written by the simulation, if present
    pub ln_transmission: Option<f64>,
}

impl ThicknessPoint {
    pub fn new(thickness_cm: f64, transmission: f64, transmission_error: f64) -> Self {
        Self {
            thickness_cm,
            transmission,
            transmission_error,
            ln_transmission: None,
        }
    }

    /// ln(I/I₀), preferring the recorded value
    ///
    /// Zero or negative transmissions have no logarithm.
    pub fn ln_transmission(&self) -> Option<f64> {
        match self.ln_transmission {
            Some(ln) if ln.is_finite() => Some(ln),
            _ if self.transmission > 0.0 => Some(self.transmission.ln()),
            _ => None,
        }
    }
}

impl MeasurementPoint for ThicknessPoint {
    fn key(&self) -> Key {
        Key::Thickness(self.thickness_cm)
    }

    fn value(&self) -> f64 {
        self.transmission
    }

    fn uncertainty(&self) -> Option<f64> {
        Some(self.transmission_error)
    }
}

/// Absorber slab a transmission was simulated through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    /// Thickness (cm)
    pub thickness_cm: f64,
    /// Bulk density (g/cm³)
    pub density: f64,
}

impl Slab {
    pub fn new(thickness_cm: f64, density: f64) -> Self {
        Self {
            thickness_cm,
            density,
        }
    }
}

/// Simulated mass attenuation coefficient at one energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyPoint {
    /// Photon energy (keV)
    pub energy_kev: f64,
    /// Simulated μ/ρ (cm²/g)
    pub mu_rho: f64,
    /// Transmission the μ/ρ was derived from, if any
    pub transmission: Option<f64>,
    /// Reference μ/ρ (cm²/g) carried in the same table, if present
    pub reference_mu_rho: Option<f64>,
    /// Percent difference as quoted by the table, if present
    pub quoted_difference: Option<f64>,
}

impl EnergyPoint {
    pub fn new(energy_kev: f64, mu_rho: f64) -> Self {
        Self {
            energy_kev,
            mu_rho,
            transmission: None,
            reference_mu_rho: None,
            quoted_difference: None,
        }
    }

    /// Simulated point from a transmission through a slab
    ///
    /// μ = -ln(T)/x, and μ/ρ follows from the slab density.
    ///
    /// ```rust
    /// # use gtools_compare::{EnergyPoint, Slab};
    /// let water = Slab::new(5.0, 1.0);
    /// let point = EnergyPoint::from_transmission(662.0, 0.65, &water).unwrap();
    /// assert!((point.mu_rho - 0.08616).abs() < 1e-5);
    /// assert_eq!(point.transmission, Some(0.65));
    ///
    /// // nothing gets through, no finite coefficient
    /// assert!(EnergyPoint::from_transmission(10.0, 0.0, &water).is_err());
    /// ```
    pub fn from_transmission(energy_kev: f64, transmission: f64, slab: &Slab) -> Result<Self> {
        let mu = calc::local_coefficient(transmission, slab.thickness_cm)?;
        let mu_rho = calc::mass_coefficient(mu, slab.density)?;
        Ok(Self {
            transmission: Some(transmission),
            ..Self::new(energy_kev, mu_rho)
        })
    }
}

impl MeasurementPoint for EnergyPoint {
    fn key(&self) -> Key {
        Key::Energy(self.energy_kev)
    }

    fn value(&self) -> f64 {
        self.mu_rho
    }

    fn uncertainty(&self) -> Option<f64> {
        None
    }
}

/// Simulated linear attenuation coefficient of one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPoint {
    /// Normalised material key
    pub material: String,
    /// Simulated μ (cm⁻¹)
    pub mu: f64,
    /// Measured I/I₀ through the slab, if recorded
    pub transmission: Option<f64>,
    /// Density (g/cm³), if recorded
    pub density: Option<f64>,
    /// Transmitted photon count, if recorded
    pub transmitted: Option<u64>,
    /// Total photon count, if recorded
    pub total: Option<u64>,
}

impl MaterialPoint {
    pub fn new(material: &str, mu: f64) -> Self {
        Self {
            material: material.material_key(),
            mu,
            transmission: None,
            density: None,
            transmitted: None,
            total: None,
        }
    }

    /// Binomial uncertainty on the transmission, sqrt(T(1-T)/N)
    ///
    /// Only available with both the transmission and the photon total.
    ///
    /// ```rust
    /// # use gtools_compare::MaterialPoint;
    /// let mut water = MaterialPoint::new("water", 0.0342);
    /// assert_eq!(water.transmission_error(), None);
    ///
    /// water.transmission = Some(0.5);
    /// water.total = Some(10_000);
    /// let sigma = water.transmission_error().unwrap();
    /// assert!((sigma - 0.005).abs() < 1e-12);
    /// ```
    pub fn transmission_error(&self) -> Option<f64> {
        let transmission = self.transmission?;
        let total = self.total?;
        calc::binomial_uncertainty(transmission, total).ok()
    }
}

impl MeasurementPoint for MaterialPoint {
    fn key(&self) -> Key {
        Key::Material(self.material.clone())
    }

    fn value(&self) -> f64 {
        self.mu
    }

    fn uncertainty(&self) -> Option<f64> {
        None
    }
}
