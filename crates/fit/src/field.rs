use serde::{Deserialize, Serialize};

/// Outcome of extracting one labelled field from a report
///
/// This replaces the sentinel values of the original scripts (a default μ of
/// `0.043` or an R² of `0.99` standing in for "not found"), which made it
/// impossible to tell a missing value from a genuine one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field<T> {
    /// Label found and the value passed validation
    Parsed(T),
    /// No line carries the label
    Missing,
    /// Label found but the value could not be used
    Invalid(String),
}

impl<T> Field<T> {
    /// Reference to the value if successfully parsed
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            _ => None,
        }
    }

    /// Consume the field, keeping only a successfully parsed value
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            _ => None,
        }
    }

    /// Label found and the value passed validation
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// No line carries the label
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Label found but the value was unusable
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Reason the field was rejected, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Invalid(reason) => Some(reason),
            _ => None,
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Parsed(value) => write!(f, "{value}"),
            Self::Missing => write!(f, "missing"),
            Self::Invalid(reason) => write!(f, "invalid ({reason})"),
        }
    }
}

/// A value with its absolute uncertainty
///
/// For example `μ = 0.0430 +/- 0.0002 cm⁻¹` is a [Measurement] with a value
/// of `0.0430` and an uncertainty of `0.0002`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Central value
    pub value: f64,
    /// Absolute uncertainty (1σ)
    pub uncertainty: f64,
}

impl Measurement {
    /// Create a new [Measurement]
    pub fn new(value: f64, uncertainty: f64) -> Self {
        Self { value, uncertainty }
    }

    /// Relative uncertainty, undefined for a zero value
    pub fn relative(&self) -> Option<f64> {
        if self.value == 0.0 {
            None
        } else {
            Some((self.uncertainty / self.value).abs())
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:.4} +/- {:.4}", self.value, self.uncertainty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_accessors() {
        let parsed = Field::Parsed(0.99);
        assert_eq!(parsed.parsed(), Some(&0.99));
        assert!(parsed.is_parsed());

        let invalid: Field<f64> = Field::Invalid("R² = 1.7 outside [0,1]".into());
        assert!(invalid.is_invalid());
        assert_eq!(invalid.reason(), Some("R² = 1.7 outside [0,1]"));
        assert_eq!(invalid.into_option(), None);

        assert!(Field::<f64>::Missing.is_missing());
    }

    #[test]
    fn relative_uncertainty() {
        let mu = Measurement::new(0.04, 0.0002);
        assert!((mu.relative().unwrap() - 0.005).abs() < 1e-12);
        assert_eq!(Measurement::new(0.0, 0.1).relative(), None);
    }
}
