//! This module provides a struct for representing reactions
use derive_builder::Builder;
use indexmap::IndexMap;

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::model::Gpr;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    ///
    /// Keys are metabolite ids, values are stoichiometric coefficients,
    /// negative for consumed metabolites and positive for produced ones
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule determining whether the reaction is active
    #[builder(default = "None")]
    pub gpr: Option<Gpr>,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Reaction {
    /// Whether the reaction exchanges mass with the environment
    ///
    /// Exchange reactions have a single metabolite, which they either
    /// drain from or supply to the network boundary.
    pub fn is_exchange(&self) -> bool {
        self.metabolites.len() == 1
    }

    /// Whether the reaction can carry flux in the reverse direction
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let rxn = ReactionBuilder::default()
            .id("PFK".to_string())
            .build()
            .unwrap();
        assert!((rxn.lower_bound + 1000.).abs() < 1e-12);
        assert!((rxn.upper_bound - 1000.).abs() < 1e-12);
        assert!(rxn.gpr.is_none());
        assert!(rxn.is_reversible());
    }

    #[test]
    fn exchange_detection() {
        let mut mets = IndexMap::new();
        mets.insert("glc__D_e".to_string(), -1.0);
        let exchange = ReactionBuilder::default()
            .id("EX_glc__D_e".to_string())
            .metabolites(mets)
            .build()
            .unwrap();
        assert!(exchange.is_exchange());

        let mut mets = IndexMap::new();
        mets.insert("glc__D_e".to_string(), -1.0);
        mets.insert("glc__D_c".to_string(), 1.0);
        let transport = ReactionBuilder::default()
            .id("GLCt".to_string())
            .metabolites(mets)
            .build()
            .unwrap();
        assert!(!transport.is_exchange());
    }
}
