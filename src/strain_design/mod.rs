//! Evolutionary search for knockout strain designs
//!
//! A [`DesignProblem`](problem::DesignProblem) bundles a model, a list of
//! optimization objectives and an environmental overlay; the
//! [`optimize`](evolutionary::optimize) engine evolves candidate knockout
//! sets against it and returns a Pareto front for tabular inspection.
use thiserror::Error;

use crate::flux_analysis::FluxError;
use crate::metabolic_model::model::ModelError;

pub mod evolutionary;
pub mod objective;
pub mod problem;
pub mod tabulate;

pub use evolutionary::{optimize, DesignSolution, SearchConfig, SolutionPopulation};
pub use objective::DesignObjective;
pub use problem::{DesignProblem, KnockoutKind};
pub use tabulate::DesignTable;

/// Errors raised while defining or solving a strain design problem
#[derive(Debug, Error)]
pub enum DesignError {
    /// A referenced reaction or gene does not exist in the model
    #[error(transparent)]
    Model(#[from] ModelError),
    /// A flux solve failed for a reason other than infeasibility
    #[error(transparent)]
    Flux(#[from] FluxError),
    /// A problem was defined without any objectives
    #[error("A strain design problem needs at least one objective")]
    NoObjectives,
    /// The decision space is empty
    #[error("No knockout candidates available for the chosen decision kind")]
    EmptyDecisionSpace,
    /// A search configuration value is out of range
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
    /// A fitness column index is out of range
    #[error("Fitness column {0} is out of range")]
    ColumnOutOfRange(usize),
}
