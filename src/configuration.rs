//! Global configuration shared across analyses
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Crate wide defaults, read whenever a value is not supplied explicitly
pub struct Configuration {
    /// Default reaction lower bound
    pub lower_bound: f64,
    /// Default reaction upper bound
    pub upper_bound: f64,
    /// Numeric tolerance used when comparing fluxes against zero
    pub tolerance: f64,
    /// Number of sample points along a production envelope
    pub envelope_points: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
            envelope_points: 20,
        }
    }
}
