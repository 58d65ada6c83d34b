// crate modules
use crate::point::{Axis, Key};

// gtools modules
use gtools_utils::{f, OptionExt, ValueExt};

// external crates
use serde::{Deserialize, Serialize};

/// One simulated value compared against its reference
///
/// Built once by the aggregation functions and never modified afterwards.
/// Derived quantities that do not apply to an axis, or that could not be
/// computed, are `None`.
///
/// | Axis      | Simulated       | Reference                  |
/// | --------- | --------------- | -------------------------- |
/// | energy    | μ/ρ (cm²/g)     | NIST μ/ρ (cm²/g)           |
/// | thickness | I/I₀            | exp(-μx) from the fit      |
/// | material  | μ (cm⁻¹)        | narrow-beam μ (cm⁻¹)       |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// Independent variable
    pub key: Key,
    /// Simulated value
    pub simulated: f64,
    /// Reference value, if one was available
    pub reference: Option<f64>,
    /// Signed percent difference from the reference
    pub difference: Option<f64>,
    /// Simulated/reference
    pub ratio: Option<f64>,

    /// ln(I/I₀)
    pub ln_transmission: Option<f64>,
    /// -ln(T)/x of a single slab (cm⁻¹)
    pub local_mu: Option<f64>,
    /// Uncertainty on the transmission
    pub transmission_error: Option<f64>,

    /// Linear attenuation coefficient (cm⁻¹)
    pub mu: Option<f64>,
    /// Mass attenuation coefficient (cm²/g)
    pub mu_rho: Option<f64>,
    /// Density used for conversions (g/cm³)
    pub density: Option<f64>,
    /// Half-value layer (cm)
    pub half_value_layer: Option<f64>,
    /// Tenth-value layer (cm)
    pub tenth_value_layer: Option<f64>,

    /// I/I₀ through the slab
    pub transmission: Option<f64>,
    /// Transmission relative to the baseline material
    pub relative_transmission: Option<f64>,
    /// Fraction of the beam removed (%)
    pub attenuation_percent: Option<f64>,
}

impl ComparisonRecord {
    /// New record with no derived quantities
    pub fn new(key: Key, simulated: f64) -> Self {
        Self {
            key,
            simulated,
            reference: None,
            difference: None,
            ratio: None,
            ln_transmission: None,
            local_mu: None,
            transmission_error: None,
            mu: None,
            mu_rho: None,
            density: None,
            half_value_layer: None,
            tenth_value_layer: None,
            transmission: None,
            relative_transmission: None,
            attenuation_percent: None,
        }
    }

    /// Axis of the record key
    pub fn axis(&self) -> Axis {
        self.key.axis()
    }
}

impl std::fmt::Display for ComparisonRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let difference = match self.difference {
            Some(d) => f!("{}%", d.signed(2)),
            None => "none".to_string(),
        };
        write!(
            f,
            "{:<12} sim {:<11} ref {:<11} diff {}",
            self.key.to_string(),
            self.simulated.sci(4, 2),
            self.reference.map(|r| r.sci(4, 2)).display(),
            difference
        )
    }
}
