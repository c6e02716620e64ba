//! Strain design problem descriptors
use crate::flux_analysis::knockout::{simulate_gene_knockout, simulate_reaction_knockout};
use crate::flux_analysis::FluxError;
use crate::metabolic_model::constraint_map::ConstraintMap;
use crate::metabolic_model::model::{Model, ModelError};
use crate::strain_design::objective::DesignObjective;
use crate::strain_design::DesignError;

/// The decision variable space searched by the evolutionary engine
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KnockoutKind {
    /// Candidate sets contain gene ids, mapped through GPR rules
    Gene,
    /// Candidate sets contain reaction ids, silenced directly
    Reaction,
}

/// A validated strain design problem
///
/// Construction checks referential consistency (objective reactions and
/// environmental constraints must exist in the model); no solving happens
/// until the engine evaluates candidates. Not mutated after construction.
#[derive(Debug)]
pub struct DesignProblem<'m> {
    model: &'m Model,
    objectives: Vec<DesignObjective>,
    environment: ConstraintMap,
    kind: KnockoutKind,
}

impl<'m> DesignProblem<'m> {
    pub fn new(
        model: &'m Model,
        objectives: Vec<DesignObjective>,
        environment: ConstraintMap,
        kind: KnockoutKind,
    ) -> Result<Self, DesignError> {
        if objectives.is_empty() {
            return Err(DesignError::NoObjectives);
        }
        for objective in &objectives {
            for id in objective.reactions() {
                if !model.reactions.contains_key(id) {
                    return Err(ModelError::UnknownReaction(id.to_string()).into());
                }
            }
        }
        environment.validate(model)?;
        // Candidate evaluation optimizes the growth objective, so one must exist
        model.biomass_reaction()?;
        Ok(DesignProblem {
            model,
            objectives,
            environment,
            kind,
        })
    }

    pub fn model(&self) -> &Model {
        self.model
    }

    pub fn objectives(&self) -> &[DesignObjective] {
        &self.objectives
    }

    pub fn objective_names(&self) -> Vec<String> {
        self.objectives.iter().map(|o| o.to_string()).collect()
    }

    pub fn kind(&self) -> KnockoutKind {
        self.kind
    }

    /// The identifiers the engine may knock out
    ///
    /// Gene searches draw from every gene in the model. Reaction searches
    /// draw from non-exchange reactions not referenced by any objective;
    /// deleting the target's own exchange or the biomass drain is never a
    /// useful design.
    pub fn candidate_pool(&self) -> Vec<String> {
        match self.kind {
            KnockoutKind::Gene => self.model.genes.keys().cloned().collect(),
            KnockoutKind::Reaction => {
                let protected: Vec<&str> = self
                    .objectives
                    .iter()
                    .flat_map(|o| o.reactions())
                    .collect();
                self.model
                    .reactions
                    .iter()
                    .filter(|(id, rxn)| {
                        !rxn.is_exchange() && !protected.contains(&id.as_str())
                    })
                    .map(|(id, _)| id.clone())
                    .collect()
            }
        }
    }

    /// Fitness of one candidate knockout set
    ///
    /// The mutant is grown (biomass objective) under the candidate knockouts
    /// composed with the environmental overlay, and every objective scores
    /// the resulting flux distribution. An infeasible mutant scores a zero
    /// fitness vector rather than failing the search.
    pub fn evaluate(&self, knockouts: &[String]) -> Result<Vec<f64>, DesignError> {
        let ids: Vec<&str> = knockouts.iter().map(String::as_str).collect();
        let result = match self.kind {
            KnockoutKind::Gene => {
                simulate_gene_knockout(self.model, &ids, None, Some(&self.environment))
            }
            KnockoutKind::Reaction => {
                simulate_reaction_knockout(self.model, &ids, None, Some(&self.environment))
            }
        };
        match result {
            Ok(solution) => Ok(self
                .objectives
                .iter()
                .map(|o| o.score(&solution))
                .collect()),
            Err(FluxError::Infeasible) => Ok(vec![0.0; self.objectives.len()]),
            Err(err) => Err(err.into()),
        }
    }
}
