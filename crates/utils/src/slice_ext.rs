use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use gtools_utils::SliceExt;
    /// # use gtools_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1, 0.5, 2.2].try_min(), Ok(0.5));
    /// assert_eq!([-58.7, -54.2].try_min(), Ok(-58.7));
    ///
    /// // Error cases
    /// assert_eq!([1.1, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// The float primitives do not implement `Ord` due to `NaN` being
    /// incomparable, so `total_cmp` is used once every value is known to be
    /// finite.
    fn try_min(&self) -> Result<T>;

    /// Find the maximum value in float arrays
    ///
    /// Same rules as [SliceExt::try_min()].
    ///
    /// ```rust
    /// # use gtools_utils::SliceExt;
    /// # use gtools_utils::Error;
    /// assert_eq!([1.1, 0.5, 2.2].try_max(), Ok(2.2));
    /// assert_eq!([1.1, f64::INFINITY].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// ```
    fn try_max(&self) -> Result<T>;

    /// Arithmetic mean of a collection of valid numbers
    ///
    /// Values are summed in slice order so that repeated calls on the same
    /// data are bit-for-bit identical.
    ///
    /// ```rust
    /// # use gtools_utils::SliceExt;
    /// # use gtools_utils::Error;
    /// assert_eq!([1.0, 2.0, 3.0].try_mean(), Ok(2.0));
    /// assert_eq!(Vec::<f64>::new().try_mean(), Err(Error::SliceContainsNoValues));
    /// ```
    fn try_mean(&self) -> Result<T>;

    /// Sample standard deviation (`n - 1` degrees of freedom)
    ///
    /// At least two values are required for the sample estimate to exist.
    ///
    /// ```rust
    /// # use gtools_utils::SliceExt;
    /// # use gtools_utils::Error;
    /// let sd = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].try_std_dev().unwrap();
    /// assert!((sd - 2.138089935).abs() < 1e-8);
    ///
    /// assert_eq!(
    ///     [1.0].try_std_dev(),
    ///     Err(Error::BelowMinimumSliceLength { length: 1, minimum_required: 2 })
    /// );
    /// ```
    fn try_std_dev(&self) -> Result<T>;
}

impl SliceExt<f64> for [f64] {
    fn try_min(&self) -> Result<f64> {
        check_finite(self)?;
        self.iter()
            .min_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        check_finite(self)?;
        self.iter()
            .max_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_mean(&self) -> Result<f64> {
        check_finite(self)?;
        if self.is_empty() {
            return Err(Error::SliceContainsNoValues);
        }
        Ok(self.iter().sum::<f64>() / self.len() as f64)
    }

    fn try_std_dev(&self) -> Result<f64> {
        let n = self.len();
        if n < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        }

        let mean = self.try_mean()?;
        let sum_sq = self.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        Ok((sum_sq / (n - 1) as f64).sqrt())
    }
}

/// Any NAN or infinite value poisons the statistics
fn check_finite(values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        Err(Error::SliceContainsUndefinedValues)
    } else {
        Ok(())
    }
}
