//! Recursive descent parser turning GPR tokens into a [`Gpr`] tree
use indexmap::IndexMap;
use thiserror::Error;

use crate::io::gpr_parse::token::Token;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::{Gpr, GprOperation};

/*
GPR Grammar:
expression -> binary
binary -> unary (("and" | "or") unary)* ;
unary -> "not" unary | primary ;
primary -> GENE | "(" expression ")" ;

e.g. (Gene1 and Gene2) or (Gene3 and not Gene4)
*/

/// GPR Parser
pub struct GprParser<'gm> {
    /// Vector of tokens from the GPR string
    tokens: Vec<Token>,
    /// Current token being processed
    current: usize,
    /// Map containing the Genes, extended with any gene id first seen here
    gene_map: &'gm mut IndexMap<String, Gene>,
}

impl<'gm> GprParser<'gm> {
    pub fn new(tokens: Vec<Token>, gene_map: &'gm mut IndexMap<String, Gene>) -> GprParser<'gm> {
        GprParser {
            tokens,
            current: 0,
            gene_map,
        }
    }

    /// Parse the token vector into a GPR AST
    pub fn parse(&mut self) -> Result<Gpr, ParseError> {
        let gpr = self.binary()?;
        if !self.is_at_end() {
            return Err(ParseError::EarlyTermination);
        }
        Ok(gpr)
    }

    fn binary(&mut self) -> Result<Gpr, ParseError> {
        let mut expr = self.unary()?;
        loop {
            let op = match self.peek() {
                Token::And => |left, right| GprOperation::And { left, right },
                Token::Or => |left, right| GprOperation::Or { left, right },
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            expr = Gpr::Operation(op(Box::new(expr), Box::new(right)));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Gpr, ParseError> {
        if *self.peek() == Token::Not {
            self.advance();
            let operand = self.unary()?;
            return Ok(Gpr::Operation(GprOperation::Not {
                val: Box::new(operand),
            }));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Gpr, ParseError> {
        if let Token::Identifier(id) = self.peek() {
            let id = id.clone();
            self.advance();
            self.insert_if_needed(&id);
            return Ok(Gpr::new_gene_node(&id));
        }
        if *self.peek() == Token::LeftParen {
            self.advance();
            let expr = self.binary()?;
            if *self.peek() != Token::RightParen {
                return Err(ParseError::MissingToken(
                    "expect ')' after expression".to_string(),
                ));
            }
            self.advance();
            return Ok(expr);
        }
        Err(ParseError::ExpectedExpression)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    /// Intern a gene id into the gene map when it is first encountered
    fn insert_if_needed(&mut self, gene_id: &str) {
        if !self.gene_map.contains_key(gene_id) {
            self.gene_map
                .insert(gene_id.to_string(), Gene::new(gene_id));
        }
    }
}

/// Enum representing possible parse errors
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    /// Missing expected token (e.g. a right parenthesis)
    #[error("Missing expected token: {0}")]
    MissingToken(String),
    /// No expression found when one was expected
    #[error("No expression found, check that the GPR string is not empty")]
    ExpectedExpression,
    /// Expression was not completed when parsing terminated
    #[error("Parsing terminated early, check for stray tokens after the expression")]
    EarlyTermination,
}
