//! Objective descriptors for strain design
use std::fmt::{Display, Formatter};

use crate::configuration::CONFIGURATION;
use crate::flux_analysis::FluxSolution;

/// A quantity to optimize during the evolutionary search
///
/// Stateless; scored against the flux solution of a candidate mutant grown
/// under the problem's environmental conditions.
#[derive(Clone, Debug, PartialEq)]
pub enum DesignObjective {
    /// Flux through a target reaction in the mutant's growth-optimal state
    TargetFlux { reaction: String },
    /// Biomass-product coupled yield: growth times product flux, divided by
    /// the absolute substrate uptake when a substrate is named
    Bpcy {
        biomass: String,
        product: String,
        substrate: Option<String>,
    },
}

impl DesignObjective {
    pub fn target_flux(reaction: &str) -> Self {
        DesignObjective::TargetFlux {
            reaction: reaction.to_string(),
        }
    }

    pub fn bpcy(biomass: &str, product: &str, substrate: Option<&str>) -> Self {
        DesignObjective::Bpcy {
            biomass: biomass.to_string(),
            product: product.to_string(),
            substrate: substrate.map(str::to_string),
        }
    }

    /// All reaction ids the descriptor references, for validation
    pub fn reactions(&self) -> Vec<&str> {
        match self {
            DesignObjective::TargetFlux { reaction } => vec![reaction],
            DesignObjective::Bpcy {
                biomass,
                product,
                substrate,
            } => {
                let mut ids = vec![biomass.as_str(), product.as_str()];
                if let Some(s) = substrate {
                    ids.push(s);
                }
                ids
            }
        }
    }

    /// Score a candidate's flux solution against this objective
    pub fn score(&self, solution: &FluxSolution) -> f64 {
        match self {
            DesignObjective::TargetFlux { reaction } => {
                solution.fluxes.get(reaction).copied().unwrap_or(0.0)
            }
            DesignObjective::Bpcy {
                biomass,
                product,
                substrate,
            } => {
                let growth = solution.fluxes.get(biomass).copied().unwrap_or(0.0);
                let produced = solution.fluxes.get(product).copied().unwrap_or(0.0);
                let coupled = growth * produced;
                match substrate {
                    Some(s) => {
                        let uptake = solution.fluxes.get(s).copied().unwrap_or(0.0).abs();
                        if uptake < CONFIGURATION.read().unwrap().tolerance {
                            0.0
                        } else {
                            coupled / uptake
                        }
                    }
                    None => coupled,
                }
            }
        }
    }
}

impl Display for DesignObjective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignObjective::TargetFlux { reaction } => write!(f, "flux({})", reaction),
            DesignObjective::Bpcy {
                biomass,
                product,
                substrate,
            } => match substrate {
                Some(s) => write!(f, "bpcy({}*{}/{})", biomass, product, s),
                None => write!(f, "bpcy({}*{})", biomass, product),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn solution(entries: &[(&str, f64)]) -> FluxSolution {
        let fluxes: IndexMap<String, f64> = entries
            .iter()
            .map(|(id, v)| (id.to_string(), *v))
            .collect();
        FluxSolution {
            objective_id: "BIOMASS".to_string(),
            objective_value: fluxes.get("BIOMASS").copied().unwrap_or(0.0),
            fluxes,
        }
    }

    #[test]
    fn target_flux_score() {
        let obj = DesignObjective::target_flux("EX_suc_e");
        let sol = solution(&[("EX_suc_e", 7.5)]);
        assert!((obj.score(&sol) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn bpcy_with_substrate() {
        let obj = DesignObjective::bpcy("BIOMASS", "EX_suc_e", Some("EX_glc_e"));
        let sol = solution(&[("BIOMASS", 10.0), ("EX_suc_e", 10.0), ("EX_glc_e", -10.0)]);
        assert!((obj.score(&sol) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn bpcy_zero_uptake_scores_zero() {
        let obj = DesignObjective::bpcy("BIOMASS", "EX_suc_e", Some("EX_glc_e"));
        let sol = solution(&[("BIOMASS", 1.0), ("EX_suc_e", 1.0), ("EX_glc_e", 0.0)]);
        assert!(obj.score(&sol).abs() < 1e-12);
    }

    #[test]
    fn referenced_reactions() {
        let obj = DesignObjective::bpcy("BIOMASS", "EX_suc_e", Some("EX_glc_e"));
        assert_eq!(obj.reactions(), vec!["BIOMASS", "EX_suc_e", "EX_glc_e"]);
        assert_eq!(format!("{}", obj), "bpcy(BIOMASS*EX_suc_e/EX_glc_e)");
    }
}
