//! Constraint based metabolic modeling and evolutionary strain design.
//!
//! `strainrs` loads genome scale metabolic models from COBRA style JSON,
//! runs flux balance analysis through the [Clarabel](https://docs.rs/clarabel)
//! interior point solver, simulates gene and reaction knockouts, traces
//! production envelopes, and searches for growth-coupled knockout strategies
//! with a multi-objective evolutionary algorithm.

pub mod configuration;
pub mod flux_analysis;
pub mod io;
pub mod metabolic_model;
pub mod strain_design;
