use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default `{:e}` output drops the exponent sign and padding, which
    /// makes columns of reference coefficients hard to compare by eye.
    ///
    /// ```rust
    /// # use gtools_utils::ValueExt;
    /// assert_eq!((4.078e3).sci(3, 2), "4.078e+03".to_string());
    /// assert_eq!((0.0828).sci(2, 2), "8.28e-02".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Fixed precision with an explicit sign
    ///
    /// Percent differences read better with the sign always shown.
    ///
    /// ```rust
    /// # use gtools_utils::ValueExt;
    /// assert_eq!((-58.6957).signed(1), "-58.7".to_string());
    /// assert_eq!((3.14159).signed(2), "+3.14".to_string());
    /// ```
    fn signed(&self, precision: usize) -> String;
}

impl ValueExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", self, precision = precision);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                f!("{mantissa}e{sign}{digits:0>exp_pad$}")
            }
            // non-finite values have no exponent to pad
            None => formatted,
        }
    }

    fn signed(&self, precision: usize) -> String {
        f!("{:+.precision$}", self, precision = precision)
    }
}
