//! Label recognisers and the extraction rule for each report field

use super::values::*;
use super::Rule;
use crate::field::Measurement;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::character::complete::{char, one_of, satisfy, space0};
use nom::combinator::{not, opt};
use nom::sequence::{preceded, terminated};
use nom::IResult;

// ! Rules
/// Attenuation coefficient with uncertainty
pub(crate) const MU: Rule<Measurement> = Rule {
    name: "μ",
    label: mu_label,
    value: measurement,
    validate: valid_measurement,
};

/// Coefficient of determination, only trusted within [0,1]
pub(crate) const R_SQUARED: Rule<f64> = Rule {
    name: "R²",
    label: r_squared_label,
    value: number,
    validate: valid_r_squared,
};

/// Reduced chi-squared of the fit
pub(crate) const CHI2_NDF: Rule<f64> = Rule {
    name: "χ²/ndf",
    label: chi2_label,
    value: reduced_chi2,
    validate: valid_non_negative,
};

/// Beam energy, always converted to keV
pub(crate) const ENERGY: Rule<f64> = Rule {
    name: "energy",
    label: energy_label,
    value: energy_kev,
    validate: valid_positive,
};

/// Free text material name
pub(crate) const MATERIAL: Rule<String> = Rule {
    name: "material",
    label: material_label,
    value: material_name,
    validate: valid_name,
};

/// Half-value layer quoted by the fitting step (cm)
pub(crate) const HALF_VALUE_LAYER: Rule<f64> = Rule {
    name: "HVL",
    label: hvl_label,
    value: number,
    validate: valid_positive,
};

/// Tenth-value layer quoted by the fitting step (cm)
pub(crate) const TENTH_VALUE_LAYER: Rule<f64> = Rule {
    name: "TVL",
    label: tvl_label,
    value: number,
    validate: valid_positive,
};

// ! Labels
/// Either `=` or `:` after optional whitespace
fn separator(i: &str) -> IResult<&str, char> {
    preceded(space0, one_of("=:"))(i)
}

/// Greek `μ`, the micro sign `µ`, or ASCII `mu`
///
/// The symbol must stand alone. It may be followed by the word `medido` or a
/// closing `)`, which covers `μ medido =` and `(mu):`. Anything else, such
/// as the `/` in `μ/ρ` or the rest of `Multiple`, means this is not the
/// linear coefficient.
pub(crate) fn mu_label(i: &str) -> IResult<&str, ()> {
    let (i, _) = alt((tag("μ"), tag("µ"), tag_no_case("mu")))(i)?;
    let (i, _) = not(satisfy(|c| c.is_alphanumeric() || c == '_'))(i)?;
    let (i, _) = space0(i)?;
    let (i, _) = opt(terminated(tag_no_case("medido"), space0))(i)?;
    let (i, _) = opt(char(')'))(i)?;
    let (i, _) = separator(i)?;
    Ok((i, ()))
}

/// `R²`, `R^2`, or `R2`
pub(crate) fn r_squared_label(i: &str) -> IResult<&str, ()> {
    let (i, _) = alt((tag("R²"), tag("R^2"), tag("R2")))(i)?;
    let (i, _) = separator(i)?;
    Ok((i, ()))
}

/// `χ²/ndf` and ascii variants
pub(crate) fn chi2_label(i: &str) -> IResult<&str, ()> {
    let (i, _) = alt((
        tag("χ²/ndf"),
        tag("χ2/ndf"),
        tag_no_case("chi2/ndf"),
        tag_no_case("chi2/ndof"),
    ))(i)?;
    let (i, _) = separator(i)?;
    Ok((i, ()))
}

/// `Energy:`, but not `Energy range:`
pub(crate) fn energy_label(i: &str) -> IResult<&str, ()> {
    let (i, _) = tag_no_case("energy")(i)?;
    let (i, _) = separator(i)?;
    Ok((i, ()))
}

pub(crate) fn material_label(i: &str) -> IResult<&str, ()> {
    let (i, _) = tag_no_case("material")(i)?;
    let (i, _) = separator(i)?;
    Ok((i, ()))
}

pub(crate) fn hvl_label(i: &str) -> IResult<&str, ()> {
    let (i, _) = alt((tag_no_case("half-value layer"), tag_no_case("hvl")))(i)?;
    let (i, _) = separator(i)?;
    Ok((i, ()))
}

pub(crate) fn tvl_label(i: &str) -> IResult<&str, ()> {
    let (i, _) = alt((tag_no_case("tenth-value layer"), tag_no_case("tvl")))(i)?;
    let (i, _) = separator(i)?;
    Ok((i, ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mu_labels() {
        assert_eq!(mu_label("μ = 0.043"), Ok((" 0.043", ())));
        assert_eq!(mu_label("µ = 0.043"), Ok((" 0.043", ())));
        assert_eq!(mu_label("mu = 0.043"), Ok((" 0.043", ())));
        assert_eq!(mu_label("MU: 0.043"), Ok((" 0.043", ())));
        assert_eq!(mu_label("μ medido = 0.043"), Ok((" 0.043", ())));
        assert_eq!(mu_label("mu): 0.0857"), Ok((" 0.0857", ())));

        // mass coefficients and other words are not the linear coefficient
        assert!(mu_label("μ/ρ NIST: 0.0835").is_err());
        assert!(mu_label("Muscle").is_err());
        assert!(mu_label("mu_rho = 1").is_err());
        assert!(mu_label("Multiple scattering: on").is_err());
        assert!(mu_label("μ fitted = 0.043").is_err());
    }

    #[test]
    fn r_squared_labels() {
        assert!(r_squared_label("R² = 0.99").is_ok());
        assert!(r_squared_label("R^2 = 0.99").is_ok());
        assert!(r_squared_label("R2: 0.99").is_ok());
        assert!(r_squared_label("R = 0.99").is_err());
    }

    #[test]
    fn energy_range_is_not_energy() {
        assert!(energy_label("Energy: 662 keV (Cs-137)").is_ok());
        assert!(energy_label("Energy range: 1 keV - 20000 keV").is_err());
    }

    #[test]
    fn layer_labels() {
        assert_eq!(hvl_label("Half-value layer: 8.09 cm"), Ok((" 8.09 cm", ())));
        assert_eq!(tvl_label("Tenth-value layer: 26.87 cm"), Ok((" 26.87 cm", ())));
        assert!(hvl_label("Tenth-value layer: 26.87 cm").is_err());
    }
}
