//! Module for parsing Gene Protein Reaction strings into AST values
use indexmap::IndexMap;
use thiserror::Error;

use crate::io::gpr_parse::lexer::LexerError;
use crate::io::gpr_parse::parser::ParseError;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::Gpr;

mod lexer;
pub mod parser;
mod token;

/// Parse a Gene Protein Reaction string into a GPR tree
///
/// Any gene id appearing in the rule but absent from `gene_map` is inserted
/// as a new active gene, matching the permissive behavior of COBRA model
/// files whose gene list lags their reaction rules.
pub fn parse_gpr(input: &str, gene_map: &mut IndexMap<String, Gene>) -> Result<Gpr, GprParseError> {
    let tokens = lexer::Lexer::new(input).lex()?;
    let gpr = parser::GprParser::new(tokens, gene_map).parse()?;
    Ok(gpr)
}

/// Enum representing possible lex and parse errors
#[derive(Debug, Error)]
pub enum GprParseError {
    /// Lexing Error
    #[error("Error occurred during lexing (conversion of GPR string to tokens): {0}")]
    LexingError(#[from] LexerError),
    /// Parsing Error
    #[error("Error occurred during parsing (conversion of tokens to GPR tree): {0}")]
    ParsingError(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::model::GprOperation;

    #[test]
    fn parse_and_intern() {
        let mut gene_map: IndexMap<String, Gene> = IndexMap::new();
        let gpr = parse_gpr("b3916 or b1723", &mut gene_map).unwrap();
        match gpr {
            Gpr::Operation(GprOperation::Or { left, right }) => {
                assert_eq!(*left, Gpr::new_gene_node("b3916"));
                assert_eq!(*right, Gpr::new_gene_node("b1723"));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
        assert_eq!(gene_map.len(), 2);
    }
}
