//! End to end succinate strain design on the bundled core network
use std::path::PathBuf;

use strainrs::flux_analysis::{
    fba, production_envelope, simulate_gene_knockout, simulate_reaction_knockout, FluxError,
};
use strainrs::metabolic_model::constraint_map::ConstraintMap;
use strainrs::metabolic_model::model::Model;
use strainrs::strain_design::{
    optimize, DesignObjective, DesignProblem, DesignTable, KnockoutKind, SearchConfig,
};

const TOL: f64 = 1e-4;

fn load_model() -> Model {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join("succ_core.json");
    Model::read_json(path).expect("bundled model should parse")
}

fn anaerobic_model() -> Model {
    let mut model = load_model();
    model.set_lower_bound("EX_o2_e", 0.0).unwrap();
    model
}

#[test]
fn aerobic_growth_uses_respiration() {
    let model = load_model();
    let solution = fba(&model, None, None).unwrap();
    assert_eq!(solution.objective_id, "BIOMASS");
    assert!((solution.objective_value - 30.0).abs() < TOL);
    assert!(solution.flux("RESP").unwrap() > 9.0);
}

#[test]
fn wild_type_secretes_no_succinate_anaerobically() {
    let model = anaerobic_model();
    let solution = fba(&model, None, None).unwrap();
    assert!((solution.objective_value - 15.0).abs() < TOL);
    assert!(solution.flux("EX_suc_e").unwrap().abs() < TOL);
}

#[test]
fn succinate_potential_exists_without_coupling() {
    let model = anaerobic_model();
    let solution = fba(&model, Some("EX_suc_e"), None).unwrap();
    assert!((solution.objective_value - 10.0).abs() < TOL);
}

#[test]
fn ethanol_knockout_couples_succinate_to_growth() {
    let model = anaerobic_model();
    let solution = simulate_gene_knockout(&model, &["g_eth"], None, None).unwrap();
    assert!((solution.objective_value - 10.0).abs() < TOL);
    assert!((solution.flux("EX_suc_e").unwrap() - 10.0).abs() < TOL);

    // The equivalent reaction deletion gives the same phenotype
    let by_reaction = simulate_reaction_knockout(&model, &["FERM_ETH"], None, None).unwrap();
    assert!((by_reaction.objective_value - solution.objective_value).abs() < TOL);
}

#[test]
fn larger_reaction_set_reaches_the_same_design() {
    let model = load_model();
    let knockouts = ["O2t", "RESP", "FERM_ETH", "ETHt"];
    let solution = simulate_reaction_knockout(&model, &knockouts, None, None).unwrap();
    assert!((solution.objective_value - 10.0).abs() < TOL);
    assert!((solution.flux("EX_suc_e").unwrap() - 10.0).abs() < TOL);
}

#[test]
fn closed_uptake_forces_zero_growth() {
    let mut model = load_model();
    model.set_reaction_bounds("EX_glc_e", 0.0, 0.0).unwrap();
    let solution = fba(&model, None, None).unwrap();
    assert!(solution.objective_value.abs() < TOL);
}

#[test]
fn forced_uptake_with_blocked_transport_is_infeasible() {
    let model = load_model();
    let mut overlay = ConstraintMap::new();
    overlay.fix("EX_glc_e", -10.0);
    overlay.knock_out("GLCt");
    assert!(matches!(
        fba(&model, None, Some(&overlay)),
        Err(FluxError::Infeasible)
    ));
}

#[test]
fn envelope_spans_the_growth_range() {
    let model = anaerobic_model();
    let envelope = production_envelope(&model, "BIOMASS", "EX_suc_e", None, 11).unwrap();
    assert_eq!(envelope.points.len(), 11);
    let first = envelope.points.first().unwrap();
    let last = envelope.points.last().unwrap();
    assert!(first.x.abs() < TOL);
    assert!((last.x - 15.0).abs() < TOL);
    // Maximum growth leaves no slack for succinate
    assert!(last.y_max.abs() < 1e-2);
    assert!(envelope.peak() > 5.0);
}

#[test]
fn evolutionary_search_to_report() {
    let model = load_model();
    let mut environment = ConstraintMap::new();
    environment.set("EX_o2_e", 0.0, 1000.0);
    let objectives = vec![
        DesignObjective::target_flux("EX_suc_e"),
        DesignObjective::bpcy("BIOMASS", "EX_suc_e", Some("EX_glc_e")),
    ];
    let problem =
        DesignProblem::new(&model, objectives, environment, KnockoutKind::Gene).unwrap();
    let config = SearchConfig {
        population_size: 10,
        max_generations: 15,
        max_knockouts: 3,
        seed: Some(42),
        ..SearchConfig::default()
    };
    let population = optimize(&problem, &config).unwrap();
    assert!(!population.solutions.is_empty());
    assert!(population.solutions.len() <= 10);

    let mut table = DesignTable::from_population(&population);
    table.strip_prefix("g_").sort_by_knockout_count();
    let counts: Vec<usize> = table.rows.iter().map(|r| r.knockout_count).collect();
    assert!(counts.windows(2).all(|w| w[0] <= w[1]));

    table.sort_by_objective(0).unwrap();
    // At least one surviving design secretes succinate
    assert!(table.rows[0].fitness[0] > 1.0);

    let rendered = table.to_string();
    assert!(rendered.contains("flux(EX_suc_e)"));
    let svg = table.scatter_svg(0, 1, 480, 320).unwrap();
    assert!(svg.starts_with("<svg"));
}
