//! Boolean search-intent language: `&&` (and), `||` (or), `-` (not), parentheses.

mod lexer;
mod parser;
mod query;

pub use parser::{Expr, parse_expression};
pub use query::{QueryParts, SearchBackend, compile_query};
