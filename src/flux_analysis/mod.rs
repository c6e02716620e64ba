//! Flux balance analysis and derived methods
//!
//! All solves are blocking calls into the Clarabel interior point solver; a
//! model held by the caller may be mutated between calls but must not be
//! shared across concurrent solves.
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use thiserror::Error;

use crate::metabolic_model::model::{Model, ModelError};

pub mod envelope;
pub mod fba;
pub mod knockout;

pub use envelope::{production_envelope, ProductionEnvelope};
pub use fba::{fba, flux_range};
pub use knockout::{simulate_gene_knockout, simulate_reaction_knockout};

/// The result of one flux balance analysis call
///
/// Immutable once returned; a feasible solution with a zero objective is a
/// valid outcome, distinct from [`FluxError::Infeasible`].
#[derive(Clone, Debug)]
pub struct FluxSolution {
    /// Id of the reaction whose flux was optimized
    pub objective_id: String,
    /// Optimized objective value
    pub objective_value: f64,
    /// Achieved flux for every reaction, in model order
    pub fluxes: IndexMap<String, f64>,
}

impl FluxSolution {
    /// Flux through a single reaction
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownReaction`] for an id the solve never saw
    pub fn flux(&self, reaction: &str) -> Result<f64, ModelError> {
        self.fluxes
            .get(reaction)
            .copied()
            .ok_or_else(|| ModelError::UnknownReaction(reaction.to_string()))
    }

    /// Exchange-only view of the flux distribution, for quick inspection
    pub fn summary(&self, model: &Model) -> String {
        let mut lines = vec![format!(
            "{} = {:.6}",
            self.objective_id, self.objective_value
        )];
        for (id, rxn) in &model.reactions {
            if rxn.is_exchange() {
                if let Some(v) = self.fluxes.get(id) {
                    lines.push(format!("  {} = {:.6}", id, v));
                }
            }
        }
        lines.join("\n")
    }
}

impl Display for FluxSolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FluxSolution({} = {:.6}, {} reactions)",
            self.objective_id,
            self.objective_value,
            self.fluxes.len()
        )
    }
}

/// Errors raised by flux analysis calls
#[derive(Debug, Error)]
pub enum FluxError {
    /// A referenced reaction or gene does not exist, or bounds are inverted
    #[error(transparent)]
    Model(#[from] ModelError),
    /// No feasible flux distribution exists under the given bounds
    #[error("No feasible flux distribution exists under the given bounds")]
    Infeasible,
    /// The objective can be improved without limit
    #[error("Objective is unbounded under the given bounds")]
    Unbounded,
    /// The solver stopped without reaching an optimum
    #[error("Solver halted with status {0}")]
    Solver(String),
}
