//! dia-test - Regression test framework for document image analysis
//!
//! This crate provides the bookkeeping used by the `*_reg` integration
//! tests of every workspace crate, supporting two modes:
//!
//! - **Compare**: Compare computed values against expected ones (default)
//! - **Display**: Also print intermediate results for visual inspection
//!
//! Fixtures are synthesized in code; no image files are read.
//!
//! # Usage
//!
//! ```ignore
//! use dia_test::{RegParams, fixtures};
//!
//! let mut rp = RegParams::new("conncomp");
//! rp.compare_values(2.0, components.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"
//! - `RUST_LOG`: Filter for the tracing output installed by [`init_tracing`]

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Install a tracing subscriber that writes to the test harness output
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
