//! This module provides the Gene struct, representing a gene in the model
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// Structure Representing a Gene
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Gene {
    /// Used to identify the gene
    pub id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Whether this gene is currently considered functional (see [`GeneActivity`])
    #[builder(default = "GeneActivity::Active")]
    pub activity: GeneActivity,
    /// Notes about the gene
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Gene Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Gene {
    pub fn new(id: &str) -> Gene {
        GeneBuilder::default()
            .id(id.to_string())
            .build()
            .expect("gene with an id always builds")
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Whether a gene is considered functional
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum GeneActivity {
    /// Gene is considered active
    Active,
    /// Gene is considered knocked out
    Inactive,
}
