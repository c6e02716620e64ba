//! Module providing JSON IO for strainrs Models
//!
//! The format is the COBRA community JSON schema: top level `metabolites`,
//! `reactions` and `genes` arrays, with `gene_reaction_rule` strings and an
//! optional `objective_coefficient` marking the growth reaction.
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::io::gpr_parse::{parse_gpr, GprParseError};
use crate::metabolic_model::gene::{Gene, GeneActivity};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    genes: Vec<JsonGene>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    #[serde(default)]
    gene_reaction_rule: String,
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    id: String,
    name: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
impl From<JsonGene> for Gene {
    fn from(g: JsonGene) -> Self {
        // Notes and annotations are weakly structured, keep them as JSON text
        Self {
            id: g.id,
            name: g.name,
            activity: GeneActivity::Active,
            notes: g.notes.map(|v| v.to_string()),
            annotation: g.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: m.notes.map(|v| v.to_string()),
            annotation: m.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<Gene> for JsonGene {
    fn from(g: Gene) -> Self {
        Self {
            id: g.id,
            name: g.name,
            notes: g.notes.map(|n| json_or_text(&n)),
            annotation: g.annotation.map(|a| json_or_text(&a)),
        }
    }
}

impl From<Metabolite> for JsonMetabolite {
    fn from(m: Metabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: Some(m.charge),
            formula: m.formula,
            notes: m.notes.map(|n| json_or_text(&n)),
            annotation: m.annotation.map(|a| json_or_text(&a)),
        }
    }
}

fn json_or_text(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or(Value::String(raw.to_string()))
}

impl Model {
    /// Read a model from a COBRA style JSON file
    ///
    /// # Errors
    /// Fails with a [`JsonError`] when the file cannot be read, the JSON does
    /// not match the schema, a GPR rule does not parse, or a reaction
    /// references a metabolite absent from the metabolite list.
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str =
            fs::read_to_string(path).map_err(|err| JsonError::UnableToRead(format!("{:?}", err)))?;
        let json_model = serde_json::from_str::<JsonModel>(&model_str)
            .map_err(|err| JsonError::UnableToParse(format!("{:?}", err)))?;
        Model::from_json(json_model)
    }

    /// Write the model to a COBRA style JSON file
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_model = self.to_json();
        let model_string = serde_json::to_string(&json_model)?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut genes: IndexMap<String, Gene> = IndexMap::new();
        let mut metabolites: IndexMap<String, Metabolite> = IndexMap::new();
        let mut reactions: IndexMap<String, Reaction> = IndexMap::new();
        let mut objective: IndexMap<String, f64> = IndexMap::new();

        json_model.genes.into_iter().for_each(|g| {
            genes.insert(g.id.clone(), Gene::from(g));
        });
        json_model.metabolites.into_iter().for_each(|m| {
            metabolites.insert(m.id.clone(), Metabolite::from(m));
        });

        for rxn in json_model.reactions {
            // Stoichiometric consistency: every metabolite a reaction touches
            // must appear in the metabolite list
            for met_id in rxn.metabolites.keys() {
                if !metabolites.contains_key(met_id) {
                    return Err(JsonError::UnknownMetabolite {
                        reaction: rxn.id.clone(),
                        metabolite: met_id.clone(),
                    });
                }
            }
            let gpr = if !rxn.gene_reaction_rule.is_empty() {
                Some(parse_gpr(&rxn.gene_reaction_rule, &mut genes)?)
            } else {
                None
            };
            let new_reaction = ReactionBuilder::default()
                .id(rxn.id.clone())
                .metabolites(rxn.metabolites)
                .name(rxn.name)
                .gpr(gpr)
                .lower_bound(rxn.lower_bound)
                .upper_bound(rxn.upper_bound)
                .subsystem(rxn.subsystem)
                .notes(rxn.notes.map(|v| v.to_string()))
                .annotation(rxn.annotation.map(|v| v.to_string()))
                .build()?;
            reactions.insert(rxn.id.clone(), new_reaction);
            if let Some(coef) = rxn.objective_coefficient {
                if coef != 0.0 {
                    objective.insert(rxn.id, coef);
                }
            }
        }

        Ok(Model {
            reactions,
            genes,
            metabolites,
            objective,
            id: json_model.id,
            compartments: json_model.compartments,
            version: json_model.version,
        })
    }

    fn to_json(&self) -> JsonModel {
        let json_genes: Vec<JsonGene> =
            self.genes.values().map(|g| g.clone().into()).collect();
        let json_metabolites: Vec<JsonMetabolite> =
            self.metabolites.values().map(|m| m.clone().into()).collect();
        let json_reactions: Vec<JsonReaction> = self
            .reactions
            .values()
            .map(|r| JsonReaction {
                id: r.id.clone(),
                name: r.name.clone(),
                metabolites: r.metabolites.clone(),
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_reaction_rule: r
                    .gpr
                    .as_ref()
                    .map(|rule| rule.to_string_id())
                    .unwrap_or_default(),
                objective_coefficient: self.objective.get(&r.id).copied(),
                subsystem: r.subsystem.clone(),
                notes: r.notes.as_deref().map(json_or_text),
                annotation: r.annotation.as_deref().map(json_or_text),
            })
            .collect();

        JsonModel {
            metabolites: json_metabolites,
            reactions: json_reactions,
            genes: json_genes,
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

/// Errors while loading or writing a JSON model; all are fatal to the load
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to parse a GPR rule during conversion from JSON: {0}")]
    GprParserError(#[from] GprParseError),
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Reaction {reaction} references metabolite {metabolite} which is not in the model")]
    UnknownMetabolite { reaction: String, metabolite: String },
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Serde json error")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}
// endregion Conversions

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_model_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("succ_core.json")
    }

    #[test]
    fn json_reaction_deserialize() {
        let data = r#"{
            "id": "FERM_SUC",
            "name": "Succinate fermentation",
            "metabolites": {"glc_c": -1.0, "bm_c": 1.0, "suc_c": 1.0},
            "lower_bound": 0.0,
            "upper_bound": 1000.0,
            "gene_reaction_rule": "g_suc",
            "subsystem": "Fermentation"
        }"#;
        let reaction: JsonReaction = serde_json::from_str(data).unwrap();
        assert_eq!(reaction.id, "FERM_SUC");
        assert!((reaction.metabolites["glc_c"] + 1.0).abs() < 1e-12);
        assert!((reaction.upper_bound - 1000.0).abs() < 1e-12);
        assert_eq!(reaction.gene_reaction_rule, "g_suc");
    }

    #[test]
    fn read_model_file() {
        let model = Model::read_json(test_model_path()).unwrap();
        assert_eq!(model.id.as_deref(), Some("succ_core"));
        assert!(model.reactions.contains_key("EX_suc_e"));
        assert!(model.genes.contains_key("g_eth"));
        assert_eq!(model.biomass_reaction().unwrap(), "BIOMASS");

        let glct = &model.reactions["GLCt"];
        assert_eq!(
            glct.gpr.as_ref().unwrap().to_string_id(),
            "(g_glct1 or g_glct2)"
        );
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Model::read_json("no_such_model.json"),
            Err(JsonError::UnableToRead(_))
        ));
    }

    #[test]
    fn inconsistent_stoichiometry() {
        let data = r#"{
            "metabolites": [{"id": "a_c"}],
            "reactions": [{
                "id": "R1",
                "metabolites": {"a_c": -1.0, "ghost_c": 1.0},
                "lower_bound": 0.0,
                "upper_bound": 1000.0
            }],
            "genes": [],
            "id": "broken"
        }"#;
        let json_model: JsonModel = serde_json::from_str(data).unwrap();
        assert!(matches!(
            Model::from_json(json_model),
            Err(JsonError::UnknownMetabolite { .. })
        ));
    }

    #[test]
    fn round_trip() {
        let model = Model::read_json(test_model_path()).unwrap();
        let json_model = model.to_json();
        let text = serde_json::to_string(&json_model).unwrap();
        let reparsed: JsonModel = serde_json::from_str(&text).unwrap();
        let reloaded = Model::from_json(reparsed).unwrap();
        assert_eq!(reloaded.reactions.len(), model.reactions.len());
        assert_eq!(reloaded.genes.len(), model.genes.len());
        assert_eq!(reloaded.objective, model.objective);
    }
}
