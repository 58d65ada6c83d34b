use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Better option outputs
    ///
    /// Generic over anything that implements `Display`, this will either be the
    /// value contained within `Some()` or "none" for the `None` variant.
    ///
    /// ```rust
    /// # use gtools_utils::OptionExt;
    /// let r_squared: Option<f64> = Some(0.9987);
    /// assert_eq!(r_squared.display(), "0.9987");
    ///
    /// let r_squared: Option<f64> = None;
    /// assert_eq!(r_squared.display(), "none");
    /// ```
    fn display(&self) -> String;

    /// Fixed precision output for optional floats
    ///
    /// ```rust
    /// # use gtools_utils::OptionExt;
    /// assert_eq!(Some(0.034210).fixed(4), "0.0342");
    /// assert_eq!(None::<f64>.fixed(4), "none");
    /// ```
    fn fixed(&self, precision: usize) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }

    fn fixed(&self, precision: usize) -> String {
        match self {
            Some(value) => f!("{value:.precision$}"),
            None => "none".to_string(),
        }
    }
}
