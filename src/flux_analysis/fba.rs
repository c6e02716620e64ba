//! Flux balance analysis over the Clarabel interior point solver
//!
//! The steady-state LP is: choose a flux vector v maximizing the objective
//! subject to S·v = 0 and lb <= v <= ub, where S is the stoichiometric
//! matrix and the bounds are the model's, with an optional transient
//! [`ConstraintMap`] overlay layered on top.
use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use indexmap::IndexMap;
use log::{debug, warn};
use nalgebra_sparse::{CooMatrix, CscMatrix};

use crate::flux_analysis::{FluxError, FluxSolution};
use crate::metabolic_model::constraint_map::ConstraintMap;
use crate::metabolic_model::model::{Model, ModelError};

/// Run flux balance analysis
///
/// `objective` overrides the model's designated growth objective with a
/// single reaction to maximize; `overlay` layers transient bounds on top of
/// the model's own without mutating it.
///
/// # Errors
/// [`FluxError::Infeasible`] when no feasible flux distribution exists. A
/// feasible optimum of zero is returned as a normal solution.
pub fn fba(
    model: &Model,
    objective: Option<&str>,
    overlay: Option<&ConstraintMap>,
) -> Result<FluxSolution, FluxError> {
    let (objective_id, q) = objective_vector(model, objective)?;
    debug!(
        "fba: model {:?}, objective {}, {} overlay bounds",
        model.id,
        objective_id,
        overlay.map_or(0, ConstraintMap::len)
    );
    let x = solve(model, &q, overlay)?;
    let objective_value = -q.iter().zip(&x).map(|(qi, xi)| qi * xi).sum::<f64>();
    let fluxes: IndexMap<String, f64> = model
        .reactions
        .keys()
        .cloned()
        .zip(x.iter().copied())
        .collect();
    Ok(FluxSolution {
        objective_id,
        objective_value,
        fluxes,
    })
}

/// Minimum and maximum achievable flux through one reaction
///
/// Two LP solves, sharing the model bounds and the same transient overlay.
pub fn flux_range(
    model: &Model,
    reaction: &str,
    overlay: Option<&ConstraintMap>,
) -> Result<(f64, f64), FluxError> {
    let idx = reaction_index(model, reaction)?;
    let n = model.reactions.len();

    let mut q = vec![0.0; n];
    q[idx] = 1.0; // minimize
    let x = solve(model, &q, overlay)?;
    let min = x[idx];

    q[idx] = -1.0; // maximize
    let x = solve(model, &q, overlay)?;
    let max = x[idx];

    Ok((min, max))
}

/// Build the linear objective (as a minimization vector) for a solve
fn objective_vector(
    model: &Model,
    objective: Option<&str>,
) -> Result<(String, Vec<f64>), FluxError> {
    let n = model.reactions.len();
    let mut q = vec![0.0; n];
    match objective {
        Some(id) => {
            let idx = reaction_index(model, id)?;
            q[idx] = -1.0;
            Ok((id.to_string(), q))
        }
        None => {
            let biomass = model.biomass_reaction()?.to_string();
            for (id, coef) in &model.objective {
                let idx = reaction_index(model, id)?;
                q[idx] = -coef;
            }
            Ok((biomass, q))
        }
    }
}

fn reaction_index(model: &Model, id: &str) -> Result<usize, ModelError> {
    model
        .reactions
        .get_index_of(id)
        .ok_or_else(|| ModelError::UnknownReaction(id.to_string()))
}

/// Formulate the LP and hand it to Clarabel, returning the flux vector
fn solve(
    model: &Model,
    q: &[f64],
    overlay: Option<&ConstraintMap>,
) -> Result<Vec<f64>, FluxError> {
    if let Some(map) = overlay {
        map.validate(model)?;
    }
    let n = model.reactions.len();
    let m = model.metabolites.len();

    // Effective bounds: overlay wins over the reaction's own bounds
    let mut lower = Vec::with_capacity(n);
    let mut upper = Vec::with_capacity(n);
    for (id, rxn) in &model.reactions {
        let (lb, ub) = overlay
            .and_then(|map| map.get(id))
            .unwrap_or((rxn.lower_bound, rxn.upper_bound));
        if lb > ub {
            return Err(ModelError::InvalidBounds {
                reaction: id.clone(),
                lower_bound: lb,
                upper_bound: ub,
            }
            .into());
        }
        lower.push(lb);
        upper.push(ub);
    }

    /*
    Conic form: A·v + s = b with s in (ZeroCone_m, NonnegativeCone_2n).
    Rows 0..m       S·v = 0            (mass balance)
    Rows m..m+n     v <= ub            (identity block)
    Rows m+n..m+2n  -v <= -lb          (negated identity block)
    */
    let mut coo = CooMatrix::new(m + 2 * n, n);
    for (j, rxn) in model.reactions.values().enumerate() {
        for (met_id, coef) in &rxn.metabolites {
            // Loader guarantees the metabolite exists
            let i = model
                .metabolites
                .get_index_of(met_id)
                .ok_or_else(|| ModelError::UnknownMetabolite(met_id.clone()))?;
            coo.push(i, j, *coef);
        }
        coo.push(m + j, j, 1.0);
        coo.push(m + n + j, j, -1.0);
    }
    let csc = CscMatrix::from(&coo);
    let (col_offsets, row_indices, values) = csc.csc_data();
    let a_mat = ClarabelCsc::new(
        m + 2 * n,
        n,
        col_offsets.to_vec(),
        row_indices.to_vec(),
        values.to_vec(),
    );

    let mut b = vec![0.0; m];
    b.extend_from_slice(&upper);
    b.extend(lower.iter().map(|lb| -lb));

    let cones = [
        SupportedConeT::ZeroConeT(m),
        SupportedConeT::NonnegativeConeT(2 * n),
    ];
    let p_mat = ClarabelCsc::zeros((n, n));
    let settings = DefaultSettings {
        verbose: false,
        ..DefaultSettings::default()
    };

    let mut solver = DefaultSolver::new(&p_mat, q, &a_mat, &b, &cones, settings);
    solver.solve();

    match solver.solution.status {
        SolverStatus::Solved => Ok(solver.solution.x.clone()),
        SolverStatus::AlmostSolved => {
            warn!("fba: solver returned an approximate optimum");
            Ok(solver.solution.x.clone())
        }
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            Err(FluxError::Infeasible)
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
            Err(FluxError::Unbounded)
        }
        status => Err(FluxError::Solver(format!("{:?}", status))),
    }
}
