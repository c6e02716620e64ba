//! This module provides the Model struct for representing an entire metabolic model
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use thiserror::Error;

use crate::metabolic_model::gene::{Gene, GeneActivity};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Gene objects
    pub genes: IndexMap<String, Gene>,
    /// Map of metabolite ids to Metabolite objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    ///
    /// The reaction carrying the growth (biomass) objective is recorded here
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model, {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
        }
    }

    /// Add a reaction to the model
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a gene to the model
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// The reaction designated as the growth objective
    ///
    /// # Errors
    /// Returns [`ModelError::NoObjective`] when no reaction carries an
    /// objective coefficient
    pub fn biomass_reaction(&self) -> Result<&str, ModelError> {
        self.objective
            .iter()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(id, _)| id.as_str())
            .ok_or(ModelError::NoObjective)
    }

    /// Look up a reaction, failing with a reference error on an unknown id
    pub fn reaction(&self, id: &str) -> Result<&Reaction, ModelError> {
        self.reactions
            .get(id)
            .ok_or_else(|| ModelError::UnknownReaction(id.to_string()))
    }
}

// region Bound mutation
/*
Persistent bound changes represent environmental conditions (for example
zeroing oxygen uptake for anaerobic growth) and survive across solver calls.
Transient per-call changes go through a ConstraintMap overlay instead.
*/
impl Model {
    /// Persistently replace both flux bounds of a reaction
    pub fn set_reaction_bounds(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ModelError> {
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidBounds {
                reaction: id.to_string(),
                lower_bound,
                upper_bound,
            });
        }
        let rxn = self
            .reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownReaction(id.to_string()))?;
        rxn.lower_bound = lower_bound;
        rxn.upper_bound = upper_bound;
        Ok(())
    }

    /// Persistently replace the lower flux bound of a reaction
    pub fn set_lower_bound(&mut self, id: &str, lower_bound: f64) -> Result<(), ModelError> {
        let upper = self.reaction(id)?.upper_bound;
        self.set_reaction_bounds(id, lower_bound, upper)
    }

    /// Persistently replace the upper flux bound of a reaction
    pub fn set_upper_bound(&mut self, id: &str, upper_bound: f64) -> Result<(), ModelError> {
        let lower = self.reaction(id)?.lower_bound;
        self.set_reaction_bounds(id, lower, upper_bound)
    }

    /// Persistently force a reaction's bounds to (0, 0)
    pub fn knock_out_reaction(&mut self, id: &str) -> Result<(), ModelError> {
        self.set_reaction_bounds(id, 0.0, 0.0)
    }
}
// endregion Bound mutation

// region GPR Functionality
/// Representation of a Gene Protein Reaction Rule as an AST
#[derive(Clone, Debug, PartialEq)]
pub enum Gpr {
    /// Operation over sub-rules (see [`GprOperation`])
    Operation(GprOperation),
    /// A terminal gene node holding the gene id
    GeneNode(String),
}

/// Possible operations on genes
#[derive(Clone, Debug, PartialEq)]
pub enum GprOperation {
    Or { left: Box<Gpr>, right: Box<Gpr> },
    And { left: Box<Gpr>, right: Box<Gpr> },
    Not { val: Box<Gpr> },
}

impl Gpr {
    /// Create a new gene node
    pub fn new_gene_node(gene: &str) -> Gpr {
        Gpr::GeneNode(gene.to_string())
    }

    /// Collect the ids of all genes appearing in the rule
    pub fn genes(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_genes(&mut found);
        found
    }

    fn collect_genes(&self, found: &mut Vec<String>) {
        match self {
            Gpr::Operation(op) => match op {
                GprOperation::Or { left, right } | GprOperation::And { left, right } => {
                    left.collect_genes(found);
                    right.collect_genes(found);
                }
                GprOperation::Not { val } => val.collect_genes(found),
            },
            Gpr::GeneNode(gene) => {
                if !found.iter().any(|g| g == gene) {
                    found.push(gene.clone());
                }
            }
        }
    }

    /// Generate a GPR string with gene ids from the GPR AST
    pub fn to_string_id(&self) -> String {
        match self {
            Gpr::Operation(op) => match op {
                GprOperation::Or { left, right } => {
                    format!("({} or {})", left.to_string_id(), right.to_string_id())
                }
                GprOperation::And { left, right } => {
                    format!("({} and {})", left.to_string_id(), right.to_string_id())
                }
                GprOperation::Not { val } => {
                    format!("(not {})", val.to_string_id())
                }
            },
            Gpr::GeneNode(gene) => gene.clone(),
        }
    }
}

impl Display for Gpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_id())
    }
}

impl Model {
    /// Evaluate a GPR rule, treating every gene in `deleted` as inactive
    pub fn eval_gpr(
        &self,
        gpr: &Gpr,
        deleted: &HashSet<String>,
    ) -> Result<GeneActivity, ModelError> {
        match gpr {
            Gpr::Operation(op) => match op {
                GprOperation::Or { left, right } => {
                    let l = self.eval_gpr(left, deleted)?;
                    let r = self.eval_gpr(right, deleted)?;
                    if l == GeneActivity::Active || r == GeneActivity::Active {
                        Ok(GeneActivity::Active)
                    } else {
                        Ok(GeneActivity::Inactive)
                    }
                }
                GprOperation::And { left, right } => {
                    let l = self.eval_gpr(left, deleted)?;
                    let r = self.eval_gpr(right, deleted)?;
                    if l == GeneActivity::Active && r == GeneActivity::Active {
                        Ok(GeneActivity::Active)
                    } else {
                        Ok(GeneActivity::Inactive)
                    }
                }
                GprOperation::Not { val } => match self.eval_gpr(val, deleted)? {
                    GeneActivity::Active => Ok(GeneActivity::Inactive),
                    GeneActivity::Inactive => Ok(GeneActivity::Active),
                },
            },
            Gpr::GeneNode(gene) => match self.genes.get(gene) {
                Some(g) => {
                    if deleted.contains(gene) {
                        Ok(GeneActivity::Inactive)
                    } else {
                        Ok(g.activity)
                    }
                }
                None => Err(ModelError::UnknownGene(gene.clone())),
            },
        }
    }

    /// Determine which reactions lose all support when a set of genes is deleted
    ///
    /// A reaction is disabled when it has a GPR rule and that rule evaluates
    /// inactive under the deletion set. Reactions without a rule are never
    /// affected by gene deletions.
    pub fn reactions_disabled_by(&self, genes: &[&str]) -> Result<Vec<String>, ModelError> {
        for gene in genes {
            if !self.genes.contains_key(*gene) {
                return Err(ModelError::UnknownGene(gene.to_string()));
            }
        }
        let deleted: HashSet<String> = genes.iter().map(|g| g.to_string()).collect();
        let mut disabled = Vec::new();
        for (id, rxn) in &self.reactions {
            if let Some(ref gpr) = rxn.gpr {
                if self.eval_gpr(gpr, &deleted)? == GeneActivity::Inactive {
                    disabled.push(id.clone());
                }
            }
        }
        Ok(disabled)
    }
}
// endregion GPR Functionality

/// Errors raised by model lookups and mutations
#[derive(Clone, Debug, Error)]
pub enum ModelError {
    #[error("Reaction {0} is not present in the model")]
    UnknownReaction(String),
    #[error("Gene {0} is not present in the model")]
    UnknownGene(String),
    #[error("Metabolite {0} is not present in the model")]
    UnknownMetabolite(String),
    #[error("Invalid bounds ({lower_bound}, {upper_bound}) for reaction {reaction}")]
    InvalidBounds {
        reaction: String,
        lower_bound: f64,
        upper_bound: f64,
    },
    #[error("Model has no reaction with an objective coefficient")]
    NoObjective,
}
