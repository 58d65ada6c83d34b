//! Parsing of Beer-Lambert fit result reports
//!
//! The fitting step of a thickness study writes its results as human-readable
//! text rather than structured data. Worse, the label text varies between the
//! scripts that write them:
//!
//! | Field          | Accepted labels                                          |
//! | -------------- | -------------------------------------------------------- |
//! | μ ± σ          | `μ =`, `μ medido =`, `mu =`, `... lineal (mu):`          |
//! | R²             | `R² =`, `R^2 =`, `R2 =`                                  |
//! | χ²/ndf         | `χ²/ndf =`, `chi2/ndf =`                                 |
//! | Energy         | `Energy: 662 keV`, `Energy: 0.662 MeV`                   |
//! | Material       | `Material: Water`                                        |
//! | HVL / TVL      | `Half-value layer: 16.12 cm`, `Tenth-value layer: ...`   |
//!
//! Some reports were also written with literal `\n` escape sequences in place
//! of real line breaks. Both are handled.
//!
//! Every field is extracted by its own rule and independently validated, so a
//! broken R² line never costs you the attenuation coefficient. The outcome of
//! each rule is a [Field]:
//!
//! - `Parsed(value)` for a valid value
//! - `Missing` when no line carries the label
//! - `Invalid(reason)` when the label exists but the value is unusable
//!
//! # Quickstart example
//!
//! ```rust
//! # use gtools_fit::{parse_fit_report, Field};
//! let report = parse_fit_report("μ = 0.0430 +/- 0.0002 cm⁻¹\\nR² = 1.7");
//!
//! // Coefficient is fine
//! let mu = report.mu.parsed().unwrap();
//! assert_eq!(mu.value, 0.0430);
//! assert_eq!(mu.uncertainty, 0.0002);
//!
//! // R² outside of [0,1] is never trusted
//! assert!(report.r_squared.is_invalid());
//! ```
//!
//! Reading from a file never fails outright. A missing or unreadable report
//! is logged and treated as a report with every field `Missing`, leaving the
//! caller to decide on a fallback.
//!
//! ```rust, no_run
//! # use gtools_fit::read_fit_report;
//! let report = read_fit_report("results/multi_thickness/fit_water_results.txt");
//! ```

mod error;
mod field;
mod parsers;
mod report;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use field::{Field, Measurement};

#[doc(inline)]
pub use report::{parse_fit_report, read_fit_report, FitReport};
