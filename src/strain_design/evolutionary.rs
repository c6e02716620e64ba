//! Multi-objective evolutionary knockout search
//!
//! A small generational genetic algorithm over knockout sets. Selection is
//! binary tournament on Pareto non-domination rank, variation is a uniform
//! union crossover plus add/drop/swap mutation, and survival is elitist
//! truncation by rank. The returned population is the first non-dominated
//! front of the final generation.

use log::{debug, info};
use rand::prelude::*;

use crate::strain_design::problem::DesignProblem;
use crate::strain_design::DesignError;

/// Knobs for the evolutionary search
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Probability a child is mutated
    pub mutation_rate: f64,
    /// Probability a child is produced by crossover rather than cloning
    pub crossover_rate: f64,
    /// Hard cap on the knockout set size of any individual
    pub max_knockouts: usize,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            population_size: 50,
            max_generations: 100,
            mutation_rate: 0.3,
            crossover_rate: 0.7,
            max_knockouts: 6,
            seed: None,
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<(), DesignError> {
        if self.population_size < 2 {
            return Err(DesignError::InvalidConfig(
                "population_size must be at least 2".to_string(),
            ));
        }
        if self.max_knockouts == 0 {
            return Err(DesignError::InvalidConfig(
                "max_knockouts must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(DesignError::InvalidConfig(
                "mutation_rate must lie in [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(DesignError::InvalidConfig(
                "crossover_rate must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

/// One evaluated knockout design
#[derive(Clone, Debug, PartialEq)]
pub struct DesignSolution {
    /// Knockout identifiers, sorted
    pub knockouts: Vec<String>,
    /// Objective scores, one per problem objective, larger is better
    pub fitness: Vec<f64>,
}

impl DesignSolution {
    /// True when self is at least as good on every objective and strictly
    /// better on one
    fn dominates(&self, other: &DesignSolution) -> bool {
        let mut strictly_better = false;
        for (a, b) in self.fitness.iter().zip(&other.fitness) {
            if a < b {
                return false;
            }
            if a > b {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// The non-dominated front returned by [`optimize`]
#[derive(Clone, Debug)]
pub struct SolutionPopulation {
    /// Display names of the problem objectives, in fitness order
    pub objectives: Vec<String>,
    pub solutions: Vec<DesignSolution>,
}

/// Run the evolutionary search over a design problem
pub fn optimize(
    problem: &DesignProblem,
    config: &SearchConfig,
) -> Result<SolutionPopulation, DesignError> {
    config.validate()?;
    let pool = problem.candidate_pool();
    if pool.is_empty() {
        return Err(DesignError::EmptyDecisionSpace);
    }
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "starting knockout search: {} candidates, population {}, {} generations",
        pool.len(),
        config.population_size,
        config.max_generations
    );

    let mut population = Vec::with_capacity(config.population_size);
    while population.len() < config.population_size {
        let size = rng.gen_range(1..=config.max_knockouts.min(pool.len()));
        let knockouts = random_subset(&pool, size, &mut rng);
        population.push(evaluate(problem, knockouts)?);
    }

    for generation in 0..config.max_generations {
        let ranks = non_domination_ranks(&population);

        let mut offspring = Vec::with_capacity(config.population_size);
        while offspring.len() < config.population_size {
            let parent_a = tournament(&population, &ranks, &mut rng);
            let mut child = if rng.gen::<f64>() < config.crossover_rate {
                let parent_b = tournament(&population, &ranks, &mut rng);
                crossover(parent_a, parent_b, config.max_knockouts, &mut rng)
            } else {
                parent_a.knockouts.clone()
            };
            if rng.gen::<f64>() < config.mutation_rate {
                mutate(&mut child, &pool, config.max_knockouts, &mut rng);
            }
            offspring.push(evaluate(problem, child)?);
        }

        population.extend(offspring);
        population = truncate(population, config.population_size);

        if let Some(best) = population.first() {
            debug!(
                "generation {}: front leader {:?} -> {:?}",
                generation, best.knockouts, best.fitness
            );
        }
    }

    let ranks = non_domination_ranks(&population);
    let mut front: Vec<DesignSolution> = population
        .into_iter()
        .zip(&ranks)
        .filter(|(_, rank)| **rank == 0)
        .map(|(solution, _)| solution)
        .collect();
    front.sort_by(|a, b| a.knockouts.cmp(&b.knockouts));
    front.dedup_by(|a, b| a.knockouts == b.knockouts);

    info!("search finished with {} non-dominated designs", front.len());
    Ok(SolutionPopulation {
        objectives: problem.objective_names(),
        solutions: front,
    })
}

fn evaluate(
    problem: &DesignProblem,
    mut knockouts: Vec<String>,
) -> Result<DesignSolution, DesignError> {
    knockouts.sort();
    knockouts.dedup();
    let fitness = problem.evaluate(&knockouts)?;
    Ok(DesignSolution { knockouts, fitness })
}

fn random_subset(pool: &[String], size: usize, rng: &mut StdRng) -> Vec<String> {
    pool.choose_multiple(rng, size).cloned().collect()
}

/// Rank 0 is the non-dominated front, rank 1 dominated only by rank 0, etc.
fn non_domination_ranks(population: &[DesignSolution]) -> Vec<usize> {
    let n = population.len();
    let mut ranks = vec![usize::MAX; n];
    let mut assigned = 0;
    let mut current = 0;
    while assigned < n {
        for i in 0..n {
            if ranks[i] != usize::MAX {
                continue;
            }
            let dominated = (0..n).any(|j| {
                j != i
                    && (ranks[j] == usize::MAX || ranks[j] == current)
                    && population[j].dominates(&population[i])
            });
            if !dominated {
                ranks[i] = current;
                assigned += 1;
            }
        }
        current += 1;
    }
    ranks
}

fn tournament<'p>(
    population: &'p [DesignSolution],
    ranks: &[usize],
    rng: &mut StdRng,
) -> &'p DesignSolution {
    let a = rng.gen_range(0..population.len());
    let b = rng.gen_range(0..population.len());
    if ranks[a] <= ranks[b] {
        &population[a]
    } else {
        &population[b]
    }
}

/// Uniform crossover over the union of the parents' knockout sets
fn crossover(
    parent_a: &DesignSolution,
    parent_b: &DesignSolution,
    max_knockouts: usize,
    rng: &mut StdRng,
) -> Vec<String> {
    let mut union: Vec<&String> = parent_a.knockouts.iter().collect();
    for id in &parent_b.knockouts {
        if !union.contains(&id) {
            union.push(id);
        }
    }
    let mut child: Vec<String> = union
        .into_iter()
        .filter(|_| rng.gen::<bool>())
        .cloned()
        .collect();
    if child.is_empty() {
        // keep at least one deletion from a parent
        if let Some(id) = parent_a.knockouts.choose(rng) {
            child.push(id.clone());
        }
    }
    while child.len() > max_knockouts {
        let drop = rng.gen_range(0..child.len());
        child.swap_remove(drop);
    }
    child
}

/// Add, drop, or swap one knockout
fn mutate(knockouts: &mut Vec<String>, pool: &[String], max_knockouts: usize, rng: &mut StdRng) {
    let unused: Vec<&String> = pool.iter().filter(|id| !knockouts.contains(id)).collect();
    let can_add = !unused.is_empty() && knockouts.len() < max_knockouts;
    let can_drop = knockouts.len() > 1;
    let can_swap = !unused.is_empty() && !knockouts.is_empty();

    let mut moves: Vec<u8> = Vec::new();
    if can_add {
        moves.push(0);
    }
    if can_drop {
        moves.push(1);
    }
    if can_swap {
        moves.push(2);
    }
    let Some(choice) = moves.choose(rng) else {
        return;
    };
    match *choice {
        0 => {
            if let Some(id) = unused.choose(rng) {
                knockouts.push((*id).clone());
            }
        }
        1 => {
            let drop = rng.gen_range(0..knockouts.len());
            knockouts.swap_remove(drop);
        }
        _ => {
            let drop = rng.gen_range(0..knockouts.len());
            knockouts.swap_remove(drop);
            if let Some(id) = unused.choose(rng) {
                knockouts.push((*id).clone());
            }
        }
    }
}

/// Elitist survival, keeping whole fronts in rank order until full
fn truncate(population: Vec<DesignSolution>, size: usize) -> Vec<DesignSolution> {
    let ranks = non_domination_ranks(&population);
    let mut indexed: Vec<(usize, DesignSolution)> =
        ranks.into_iter().zip(population).collect();
    indexed.sort_by_key(|(rank, _)| *rank);
    indexed
        .into_iter()
        .take(size)
        .map(|(_, solution)| solution)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::constraint_map::ConstraintMap;
    use crate::metabolic_model::model::Model;
    use crate::strain_design::objective::DesignObjective;
    use crate::strain_design::problem::KnockoutKind;
    use std::path::PathBuf;

    fn load_model() -> Model {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("succ_core.json");
        Model::read_json(path).unwrap()
    }

    fn anaerobic_problem(model: &Model) -> DesignProblem<'_> {
        let mut env = ConstraintMap::new();
        env.set("EX_o2_e", 0.0, 1000.0);
        let objectives = vec![
            DesignObjective::target_flux("EX_suc_e"),
            DesignObjective::bpcy("BIOMASS", "EX_suc_e", None),
        ];
        DesignProblem::new(model, objectives, env, KnockoutKind::Gene).unwrap()
    }

    fn small_config(seed: u64) -> SearchConfig {
        SearchConfig {
            population_size: 8,
            max_generations: 12,
            max_knockouts: 2,
            seed: Some(seed),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn dominance_is_strict() {
        let a = DesignSolution {
            knockouts: vec![],
            fitness: vec![1.0, 2.0],
        };
        let b = DesignSolution {
            knockouts: vec![],
            fitness: vec![1.0, 1.0],
        };
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(!a.dominates(&a));
    }

    #[test]
    fn ranks_split_fronts() {
        let population = vec![
            DesignSolution {
                knockouts: vec![],
                fitness: vec![2.0, 1.0],
            },
            DesignSolution {
                knockouts: vec![],
                fitness: vec![1.0, 2.0],
            },
            DesignSolution {
                knockouts: vec![],
                fitness: vec![0.5, 0.5],
            },
        ];
        assert_eq!(non_domination_ranks(&population), vec![0, 0, 1]);
    }

    #[test]
    fn search_finds_coupled_design() {
        let model = load_model();
        let problem = anaerobic_problem(&model);
        let result = optimize(&problem, &small_config(7)).unwrap();
        assert!(!result.solutions.is_empty());
        assert!(result.solutions.len() <= 8);
        for solution in &result.solutions {
            assert_eq!(solution.fitness.len(), 2);
            assert!(solution.knockouts.len() <= 2);
        }
        // Deleting the ethanol branch is within reach of even a short run
        let best = result
            .solutions
            .iter()
            .map(|s| s.fitness[0])
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(best > 9.0, "best succinate flux {best}");
    }

    #[test]
    fn seeded_runs_repeat() {
        let model = load_model();
        let problem = anaerobic_problem(&model);
        let first = optimize(&problem, &small_config(11)).unwrap();
        let second = optimize(&problem, &small_config(11)).unwrap();
        assert_eq!(first.solutions, second.solutions);
    }

    #[test]
    fn config_validation() {
        let model = load_model();
        let problem = anaerobic_problem(&model);
        let config = SearchConfig {
            population_size: 1,
            ..SearchConfig::default()
        };
        assert!(matches!(
            optimize(&problem, &config),
            Err(DesignError::InvalidConfig(_))
        ));
    }
}
