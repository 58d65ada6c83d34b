//! `gtools` is a modular toolkit for comparing simulated gamma attenuation
//! against reference data
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use gtools_utils as utils;

#[cfg(feature = "fit")]
#[cfg_attr(docsrs, doc(cfg(feature = "fit")))]
#[doc(inline)]
pub use gtools_fit as fit;

#[cfg(feature = "nist")]
#[cfg_attr(docsrs, doc(cfg(feature = "nist")))]
#[doc(inline)]
pub use gtools_nist as nist;

#[cfg(feature = "compare")]
#[cfg_attr(docsrs, doc(cfg(feature = "compare")))]
#[doc(inline)]
pub use gtools_compare as compare;
