//! Value parsers and validation for report fields

use crate::field::Measurement;

use gtools_utils::f;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::character::complete::{char, space0};
use nom::combinator::{opt, rest, value};
use nom::number::complete::double;
use nom::sequence::{preceded, tuple};
use nom::IResult;

/// Double precision value, trimming preceding whitespace
pub(crate) fn number(i: &str) -> IResult<&str, f64> {
    preceded(space0, double)(i)
}

/// Value and uncertainty separated by `+/-`, `+-`, or `±`
pub(crate) fn measurement(i: &str) -> IResult<&str, Measurement> {
    let (i, central) = number(i)?;
    let (i, _) = preceded(space0, alt((tag("+/-"), tag("+-"), tag("±"))))(i)?;
    let (i, uncertainty) = number(i)?;
    Ok((i, Measurement::new(central, uncertainty)))
}

/// Reduced chi-squared as either `1.204` or the console form `7.22/6 = 1.204`
pub(crate) fn reduced_chi2(i: &str) -> IResult<&str, f64> {
    let (i, first) = number(i)?;
    let (i, ratio) = opt(preceded(
        tuple((space0, char('/'), number, space0, char('='))),
        number,
    ))(i)?;
    Ok((i, ratio.unwrap_or(first)))
}

/// Energy with an optional unit, converted to keV
///
/// Bare values are assumed to already be in keV.
pub(crate) fn energy_kev(i: &str) -> IResult<&str, f64> {
    let (i, energy) = number(i)?;
    let (i, factor) = opt(preceded(
        space0,
        alt((
            value(1.0, tag_no_case("kev")),
            value(1.0e3, tag_no_case("mev")),
        )),
    ))(i)?;
    Ok((i, energy * factor.unwrap_or(1.0)))
}

/// Everything after the separator, trimmed
pub(crate) fn material_name(i: &str) -> IResult<&str, String> {
    let (i, name) = rest(i)?;
    Ok((i, name.trim().to_string()))
}

// ! Validation
pub(crate) fn valid_measurement(m: &Measurement) -> Result<(), String> {
    if !m.value.is_finite() || !m.uncertainty.is_finite() {
        Err(f!("non-finite μ = {m}"))
    } else if m.uncertainty < 0.0 {
        Err(f!("negative uncertainty in μ = {m}"))
    } else {
        Ok(())
    }
}

pub(crate) fn valid_r_squared(r: &f64) -> Result<(), String> {
    if (0.0..=1.0).contains(r) {
        Ok(())
    } else {
        Err(f!("R² = {r} outside [0,1], value discarded"))
    }
}

pub(crate) fn valid_non_negative(v: &f64) -> Result<(), String> {
    if v.is_finite() && *v >= 0.0 {
        Ok(())
    } else {
        Err(f!("expected a non-negative value, found {v}"))
    }
}

pub(crate) fn valid_positive(v: &f64) -> Result<(), String> {
    if v.is_finite() && *v > 0.0 {
        Ok(())
    } else {
        Err(f!("expected a positive value, found {v}"))
    }
}

pub(crate) fn valid_name(name: &String) -> Result<(), String> {
    if name.is_empty() {
        Err("empty material name".to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_separators() {
        let expected = Measurement::new(0.043, 0.0002);
        assert_eq!(measurement(" 0.043 +/- 0.0002 cm⁻¹"), Ok((" cm⁻¹", expected)));
        assert_eq!(measurement("0.043 ± 0.0002"), Ok(("", expected)));
        assert_eq!(measurement("0.043+-0.0002"), Ok(("", expected)));
        assert!(measurement("0.043").is_err());
        assert!(measurement("abc +/- 0.1").is_err());
    }

    #[test]
    fn chi2_forms() {
        assert_eq!(reduced_chi2(" 1.204"), Ok(("", 1.204)));
        assert_eq!(reduced_chi2(" 7.22/6 = 1.203"), Ok(("", 1.203)));
    }

    #[test]
    fn energy_units() {
        assert_eq!(energy_kev(" 662 keV (Cs-137)"), Ok((" (Cs-137)", 662.0)));
        assert_eq!(energy_kev(" 1.25 MeV"), Ok(("", 1250.0)));
        assert_eq!(energy_kev(" 662"), Ok(("", 662.0)));
    }

    #[test]
    fn r_squared_range() {
        assert!(valid_r_squared(&0.0).is_ok());
        assert!(valid_r_squared(&1.0).is_ok());
        assert!(valid_r_squared(&1.7).is_err());
        assert!(valid_r_squared(&-0.2).is_err());
        assert!(valid_r_squared(&f64::NAN).is_err());
    }
}
