//! Lex a GPR string into a series of tokens for later parsing
use thiserror::Error;

use crate::io::gpr_parse::token::Token;

pub struct Lexer<'src> {
    source: std::iter::Peekable<std::str::Chars<'src>>,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source: source.chars().peekable(),
            tokens: Vec::new(),
        }
    }

    /// Convert the source string into a token vector, terminated by [`Token::Eof`]
    pub fn lex(mut self) -> Result<Vec<Token>, LexerError> {
        while let Some(&c) = self.source.peek() {
            match c {
                '(' => {
                    self.source.next();
                    self.tokens.push(Token::LeftParen);
                }
                ')' => {
                    self.source.next();
                    self.tokens.push(Token::RightParen);
                }
                c if c.is_whitespace() => {
                    self.source.next();
                }
                c if Lexer::is_identifier_char(c) => self.read_identifier(),
                other => return Err(LexerError::InvalidCharacter(other)),
            }
        }
        self.tokens.push(Token::Eof);
        Ok(self.tokens)
    }

    fn read_identifier(&mut self) {
        let mut text = String::new();
        while let Some(&c) = self.source.peek() {
            if !Lexer::is_identifier_char(c) {
                break;
            }
            text.push(c);
            self.source.next();
        }
        let token = match text.to_ascii_lowercase().as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => Token::Identifier(text),
        };
        self.tokens.push(token);
    }

    /// Gene identifiers in COBRA models may carry digits, dots and dashes
    fn is_identifier_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum LexerError {
    #[error("Invalid character {0:?} in GPR rule")]
    InvalidCharacter(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_gene() {
        let tokens = Lexer::new("b1241").lex().unwrap();
        assert_eq!(
            tokens,
            vec![Token::Identifier("b1241".to_string()), Token::Eof]
        );
    }

    #[test]
    fn grouping_and_keywords() {
        let tokens = Lexer::new("(b3916 or b1723) AND not b0001").lex().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Identifier("b3916".to_string()),
                Token::Or,
                Token::Identifier("b1723".to_string()),
                Token::RightParen,
                Token::And,
                Token::Not,
                Token::Identifier("b0001".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn dotted_identifier() {
        let tokens = Lexer::new("STM0999.S").lex().unwrap();
        assert_eq!(
            tokens,
            vec![Token::Identifier("STM0999.S".to_string()), Token::Eof]
        );
    }

    #[test]
    fn invalid_character() {
        assert!(matches!(
            Lexer::new("b1241 & b1242").lex(),
            Err(LexerError::InvalidCharacter('&'))
        ));
    }
}
