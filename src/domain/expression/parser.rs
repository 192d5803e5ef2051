//! Recursive-descent parser producing an [`Expr`] tree.
//!
//! Grammar:
//! ```text
//! or      := and ('||' and)*
//! and     := unary ('&&' unary)*
//! unary   := '-' unary | primary
//! primary := '(' or ')' | (word | phrase)+
//! ```

use super::lexer::{Token, tokenize};
use crate::domain::AppError;

/// Deepest nesting of groups and negations accepted.
pub const MAX_DEPTH: usize = 64;

const EXCLUSION_HINT: &str =
    "unexpected '-': join exclusions with '&&', e.g. 'senior && -intern'";

/// Parsed boolean search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A search term. Multi-word terms keep their words space-separated and
    /// quoted phrases keep their quotes.
    Term(String),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

/// Parse an expression. Blank input yields `Ok(None)`.
pub fn parse_expression(expression: &str) -> Result<Option<Expr>, AppError> {
    if expression.trim().is_empty() {
        return Ok(None);
    }

    let invalid = |reason: String| AppError::InvalidExpression {
        expression: expression.to_string(),
        reason,
    };

    let tokens = tokenize(expression).map_err(invalid)?;
    let mut parser = Parser { tokens: &tokens, pos: 0, depth: 0 };
    let expr = parser.parse_or().map_err(invalid)?;

    if let Some(token) = parser.peek() {
        let reason = match token {
            Token::RParen => "unexpected ')'".to_string(),
            Token::Not => EXCLUSION_HINT.to_string(),
            other => format!("unexpected {}", describe(other)),
        };
        return Err(invalid(reason));
    }

    Ok(Some(expr))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn descend(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(format!("expression nests too deeply (limit {})", MAX_DEPTH));
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut items = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            items.push(self.parse_and()?);
        }
        Ok(flatten(items, true))
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut items = vec![self.parse_unary()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            items.push(self.parse_unary()?);
        }
        Ok(flatten(items, false))
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(match inner {
                Expr::Not(double) => *double,
                other => Expr::Not(Box::new(other)),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Some(Token::LParen) => {
                if self.peek() == Some(&Token::RParen) {
                    return Err("empty group '()'".to_string());
                }
                self.descend()?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(Token::Not) => Err(EXCLUSION_HINT.to_string()),
                    _ => Err("unclosed parenthesis".to_string()),
                }
            }
            Some(Token::Word(word)) => Ok(self.collect_term(word.clone())),
            Some(Token::Phrase(phrase)) => Ok(self.collect_term(format!("\"{}\"", phrase))),
            Some(other) => Err(format!("expected a term but found {}", describe(other))),
            None => Err("expected a term but reached the end of the expression".to_string()),
        }
    }

    fn collect_term(&mut self, first: String) -> Expr {
        let mut words = vec![first];
        loop {
            match self.peek() {
                Some(Token::Word(word)) => words.push(word.clone()),
                Some(Token::Phrase(phrase)) => words.push(format!("\"{}\"", phrase)),
                _ => break,
            }
            self.pos += 1;
        }
        Expr::Term(words.join(" "))
    }
}

fn flatten(items: Vec<Expr>, is_or: bool) -> Expr {
    if items.len() == 1 {
        return items.into_iter().next().unwrap_or_else(|| Expr::And(Vec::new()));
    }

    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match (item, is_or) {
            (Expr::Or(inner), true) | (Expr::And(inner), false) => flat.extend(inner),
            (other, _) => flat.push(other),
        }
    }

    if is_or { Expr::Or(flat) } else { Expr::And(flat) }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Word(word) => format!("'{}'", word),
        Token::Phrase(phrase) => format!("\"{}\"", phrase),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::And => "'&&'".to_string(),
        Token::Or => "'||'".to_string(),
        Token::Not => "'-'".to_string(),
    }
}
