use gtools_utils::StringExt;
use serde::{Deserialize, Serialize};

/// Absorber material and its bulk properties
///
/// Material keys are always stored normalised (trimmed, lowercase) so that
/// `"Water"` from a CSV and `"water"` from a configuration file are the same
/// thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Normalised identifier, e.g. `water`
    pub key: String,
    /// Descriptive name for summaries
    pub description: String,
    /// Bulk density (g/cm³)
    pub density: f64,
}

impl Material {
    /// Create a new [Material], normalising the key
    ///
    /// ```rust
    /// # use gtools_nist::Material;
    /// let pmma = Material::new("PMMA ", "Acrylic (PMMA)", 1.19);
    /// assert_eq!(pmma.key, "pmma");
    /// ```
    pub fn new(key: &str, description: &str, density: f64) -> Self {
        Self {
            key: key.material_key(),
            description: description.to_string(),
            density,
        }
    }

    /// Liquid water, 1.00 g/cm³
    pub fn water() -> Self {
        Self::new("water", "Water (H2O)", 1.0)
    }

    /// ICRP skeletal muscle, 1.05 g/cm³
    pub fn muscle() -> Self {
        Self::new("muscle", "Skeletal muscle", 1.05)
    }

    /// ICRU compact bone, 1.85 g/cm³
    pub fn bone() -> Self {
        Self::new("bone", "Compact bone", 1.85)
    }

    /// The standard study materials in their designated order
    ///
    /// Water is always first as it is the baseline for relative
    /// comparisons.
    ///
    /// ```rust
    /// # use gtools_nist::Material;
    /// let keys: Vec<String> = Material::standard().into_iter().map(|m| m.key).collect();
    /// assert_eq!(keys, vec!["water", "muscle", "bone"]);
    /// ```
    pub fn standard() -> Vec<Self> {
        vec![Self::water(), Self::muscle(), Self::bone()]
    }

    /// Find one of the standard materials by key
    ///
    /// ```rust
    /// # use gtools_nist::Material;
    /// assert_eq!(Material::find("Bone").unwrap().density, 1.85);
    /// assert!(Material::find("lead").is_none());
    /// ```
    pub fn find(key: &str) -> Option<Self> {
        let key = key.material_key();
        Self::standard().into_iter().find(|m| m.key == key)
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({:.2} g/cm³)", self.description, self.density)
    }
}
