//! Knockout perturbation simulators
//!
//! Both variants force the affected reactions to (0, 0) through a transient
//! overlay and re-run flux balance analysis; the model itself is never
//! mutated. A knockout set that disconnects every route to the objective
//! yields a feasible zero-objective solution, not an error.
use log::debug;

use crate::flux_analysis::fba::fba;
use crate::flux_analysis::{FluxError, FluxSolution};
use crate::metabolic_model::constraint_map::ConstraintMap;
use crate::metabolic_model::model::{Model, ModelError};

/// Simulate knocking out a set of reactions directly
pub fn simulate_reaction_knockout(
    model: &Model,
    reactions: &[&str],
    objective: Option<&str>,
    overlay: Option<&ConstraintMap>,
) -> Result<FluxSolution, FluxError> {
    for id in reactions {
        if !model.reactions.contains_key(*id) {
            return Err(ModelError::UnknownReaction(id.to_string()).into());
        }
    }
    fba(model, objective, Some(&knockout_overlay(reactions, overlay)))
}

/// Simulate knocking out a set of genes
///
/// Genes map to reactions through the boolean gene-reaction rules: every
/// reaction whose rule evaluates inactive under the deletion set is silenced.
pub fn simulate_gene_knockout(
    model: &Model,
    genes: &[&str],
    objective: Option<&str>,
    overlay: Option<&ConstraintMap>,
) -> Result<FluxSolution, FluxError> {
    let disabled = model.reactions_disabled_by(genes)?;
    debug!(
        "gene knockout {:?} silences reactions {:?}",
        genes, disabled
    );
    let ids: Vec<&str> = disabled.iter().map(String::as_str).collect();
    fba(model, objective, Some(&knockout_overlay(&ids, overlay)))
}

fn knockout_overlay(reactions: &[&str], overlay: Option<&ConstraintMap>) -> ConstraintMap {
    let mut map = overlay.cloned().unwrap_or_default();
    for id in reactions {
        map.knock_out(id);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::model::Model;
    use std::path::PathBuf;

    fn load_model() -> Model {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("succ_core.json");
        Model::read_json(path).unwrap()
    }

    #[test]
    fn gene_and_reaction_paths_agree() {
        let model = load_model();
        // g_eth maps one-to-one onto FERM_ETH
        let by_gene = simulate_gene_knockout(&model, &["g_eth"], None, None).unwrap();
        let by_reaction =
            simulate_reaction_knockout(&model, &["FERM_ETH"], None, None).unwrap();
        assert!((by_gene.objective_value - by_reaction.objective_value).abs() < 1e-4);
        assert!((by_gene.flux("FERM_ETH").unwrap()).abs() < 1e-4);
    }

    #[test]
    fn or_rule_needs_both_genes() {
        let model = load_model();
        // GLCt is (g_glct1 or g_glct2): deleting one gene leaves it active
        let one = simulate_gene_knockout(&model, &["g_glct1"], None, None).unwrap();
        assert!(one.objective_value > 1.0);

        let both =
            simulate_gene_knockout(&model, &["g_glct1", "g_glct2"], None, None).unwrap();
        assert!(both.objective_value.abs() < 1e-4);
    }

    #[test]
    fn disconnected_objective_is_zero_not_infeasible() {
        let model = load_model();
        let solution = simulate_reaction_knockout(&model, &["GLCt"], None, None).unwrap();
        assert!(solution.objective_value.abs() < 1e-4);
    }

    #[test]
    fn unknown_ids_are_reference_errors() {
        let model = load_model();
        assert!(matches!(
            simulate_reaction_knockout(&model, &["NOPE"], None, None),
            Err(FluxError::Model(ModelError::UnknownReaction(_)))
        ));
        assert!(matches!(
            simulate_gene_knockout(&model, &["g_nope"], None, None),
            Err(FluxError::Model(ModelError::UnknownGene(_)))
        ));
    }
}
