//! Representation of genome scale metabolic models

pub mod constraint_map;
pub mod gene;
pub mod metabolite;
pub mod model;
pub mod reaction;
