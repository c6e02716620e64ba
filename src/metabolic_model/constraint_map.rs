//! Transient per-call bound overlays
use indexmap::IndexMap;

use crate::metabolic_model::model::{Model, ModelError};

/// An ephemeral set of bound overrides layered on top of a model's own bounds
///
/// A `ConstraintMap` never mutates the model it is applied to. Environmental
/// conditions meant to persist across calls belong on the model itself (see
/// [`Model::set_reaction_bounds`]); knockouts and other per-call overrides
/// belong here.
#[derive(Clone, Debug, Default)]
pub struct ConstraintMap {
    bounds: IndexMap<String, (f64, f64)>,
}

impl ConstraintMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override both bounds of a reaction for the duration of one call
    pub fn set(&mut self, reaction: &str, lower_bound: f64, upper_bound: f64) -> &mut Self {
        self.bounds
            .insert(reaction.to_string(), (lower_bound, upper_bound));
        self
    }

    /// Fix a reaction's flux to a single value
    pub fn fix(&mut self, reaction: &str, value: f64) -> &mut Self {
        self.set(reaction, value, value)
    }

    /// Force a reaction's bounds to (0, 0)
    pub fn knock_out(&mut self, reaction: &str) -> &mut Self {
        self.set(reaction, 0.0, 0.0)
    }

    /// The override for a reaction, if one is present
    pub fn get(&self, reaction: &str) -> Option<(f64, f64)> {
        self.bounds.get(reaction).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &(f64, f64))> {
        self.bounds.iter()
    }

    /// Layer `other` on top of this map, later entries winning
    pub fn merged_with(&self, other: &ConstraintMap) -> ConstraintMap {
        let mut merged = self.clone();
        for (id, (lb, ub)) in other.iter() {
            merged.set(id, *lb, *ub);
        }
        merged
    }

    /// Check every referenced reaction exists in `model` and every bound pair
    /// is ordered
    pub fn validate(&self, model: &Model) -> Result<(), ModelError> {
        for (id, (lb, ub)) in &self.bounds {
            if !model.reactions.contains_key(id) {
                return Err(ModelError::UnknownReaction(id.clone()));
            }
            if lb > ub {
                return Err(ModelError::InvalidBounds {
                    reaction: id.clone(),
                    lower_bound: *lb,
                    upper_bound: *ub,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, (f64, f64))> for ConstraintMap {
    fn from_iter<I: IntoIterator<Item = (String, (f64, f64))>>(iter: I) -> Self {
        ConstraintMap {
            bounds: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::reaction::ReactionBuilder;

    fn one_reaction_model() -> Model {
        let mut model = Model::new_empty();
        model.add_reaction(
            ReactionBuilder::default()
                .id("EX_o2_e".to_string())
                .build()
                .unwrap(),
        );
        model
    }

    #[test]
    fn merge_later_wins() {
        let mut base = ConstraintMap::new();
        base.set("EX_o2_e", -20.0, 1000.0);
        let mut overlay = ConstraintMap::new();
        overlay.knock_out("EX_o2_e");
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.get("EX_o2_e"), Some((0.0, 0.0)));
    }

    #[test]
    fn validate_against_model() {
        let model = one_reaction_model();
        let mut map = ConstraintMap::new();
        map.set("EX_o2_e", 0.0, 1000.0);
        assert!(map.validate(&model).is_ok());

        map.set("EX_glc_e", 0.0, 1000.0);
        assert!(matches!(
            map.validate(&model),
            Err(ModelError::UnknownReaction(_))
        ));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let model = one_reaction_model();
        let mut map = ConstraintMap::new();
        map.set("EX_o2_e", 10.0, -10.0);
        assert!(matches!(
            map.validate(&model),
            Err(ModelError::InvalidBounds { .. })
        ));
    }
}
