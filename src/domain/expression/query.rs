//! Lowering of parsed expressions into search-engine query strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::parser::{Expr, parse_expression};
use crate::domain::AppError;

/// Search engine whose operator syntax a query is compiled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Space is an implicit AND, `-` excludes.
    #[default]
    Google,
    /// Explicit `AND` / `NOT`.
    Bing,
    /// Same operator set as Bing.
    Yahoo,
}

impl SearchBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchBackend::Google => "google",
            SearchBackend::Bing => "bing",
            SearchBackend::Yahoo => "yahoo",
        }
    }

    fn explicit_operators(&self) -> bool {
        matches!(self, SearchBackend::Bing | SearchBackend::Yahoo)
    }
}

impl fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(SearchBackend::Google),
            "bing" => Ok(SearchBackend::Bing),
            "yahoo" => Ok(SearchBackend::Yahoo),
            _ => Err(AppError::UnknownBackend(s.to_string())),
        }
    }
}

/// Top-level components of an expression, ready for query compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParts {
    /// Terms every result must contain.
    pub required: Vec<Expr>,
    /// Terms results must not contain.
    pub excluded: Vec<Expr>,
    /// OR groups; one entry per top-level disjunction.
    pub alternatives: Vec<Vec<Expr>>,
}

impl QueryParts {
    /// Split a parsed expression into required, excluded, and alternative parts.
    pub fn from_expr(expr: Option<&Expr>) -> Self {
        let mut parts = QueryParts::default();
        let conjuncts: Vec<&Expr> = match expr {
            None => Vec::new(),
            Some(Expr::And(items)) => items.iter().collect(),
            Some(other) => vec![other],
        };

        for item in conjuncts {
            match item {
                Expr::Not(inner) => match inner.as_ref() {
                    Expr::Or(members) => parts.excluded.extend(members.iter().cloned()),
                    other => parts.excluded.push(other.clone()),
                },
                Expr::Or(members) => parts.alternatives.push(members.clone()),
                other => parts.required.push(other.clone()),
            }
        }

        parts
    }

    /// Parse an expression string straight into query parts.
    pub fn parse(expression: &str) -> Result<Self, AppError> {
        let expr = parse_expression(expression)?;
        Ok(Self::from_expr(expr.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty() && self.alternatives.is_empty()
    }
}

impl fmt::Display for QueryParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |items: &[Expr]| {
            items.iter().map(|e| render(e, SearchBackend::Google, false)).collect::<Vec<_>>()
        };
        let alternatives: Vec<Vec<String>> =
            self.alternatives.iter().map(|group| names(group)).collect();
        write!(
            f,
            "required={:?} excluded={:?} alternatives={:?}",
            names(&self.required),
            names(&self.excluded),
            alternatives
        )
    }
}

/// Compile a job title and expression parts into backend-specific query syntax.
///
/// The title is always quoted and comes first.
pub fn compile_query(title: &str, parts: &QueryParts, backend: SearchBackend) -> String {
    let mut query = vec![format!("\"{}\"", title.trim())];
    let explicit = backend.explicit_operators();

    for required in &parts.required {
        let rendered = render(required, backend, true);
        query.push(if explicit { format!("AND {}", rendered) } else { rendered });
    }

    for group in &parts.alternatives {
        let members: Vec<String> = group.iter().map(|e| render(e, backend, true)).collect();
        let mut rendered = members.join(" OR ");
        if members.len() > 1 {
            rendered = format!("({})", rendered);
        }
        query.push(if explicit { format!("AND {}", rendered) } else { rendered });
    }

    for excluded in &parts.excluded {
        let rendered = render(excluded, backend, true);
        query.push(if explicit { format!("NOT {}", rendered) } else { format!("-{}", rendered) });
    }

    query.join(" ")
}

fn render(expr: &Expr, backend: SearchBackend, nested: bool) -> String {
    let explicit = backend.explicit_operators();
    match expr {
        Expr::Term(text) => text.clone(),
        Expr::Not(inner) => {
            let rendered = render(inner, backend, true);
            if explicit { format!("NOT {}", rendered) } else { format!("-{}", rendered) }
        }
        Expr::And(items) => {
            let separator = if explicit { " AND " } else { " " };
            wrap(items.iter().map(|e| render(e, backend, true)).collect(), separator, nested)
        }
        Expr::Or(items) => {
            wrap(items.iter().map(|e| render(e, backend, true)).collect(), " OR ", nested)
        }
    }
}

fn wrap(items: Vec<String>, separator: &str, nested: bool) -> String {
    let joined = items.join(separator);
    if nested && items.len() > 1 { format!("({})", joined) } else { joined }
}
