//! This module provides the Metabolite struct
use derive_builder::Builder;

/// Represents a metabolite in the metabolic model
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Metabolite {
    /// Used to identify the metabolite
    pub id: String,
    /// Human readable metabolite name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Compartment the metabolite resides in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electric charge of the metabolite
    #[builder(default = "0")]
    pub charge: i32,
    /// Chemical formula
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Notes about the metabolite
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Metabolite annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}
