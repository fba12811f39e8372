// Attribute-equality predicates for roster lookups.

use std::str::FromStr;

use crate::error::RosterError;
use crate::model::Record;

/// Conjunction of `attribute == expected` clauses. An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<(String, String)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause. Chainable: `Predicate::new().eq("state", "NY").eq("title", "Sen")`.
    pub fn eq(mut self, attribute: impl Into<String>, expected: impl Into<String>) -> Self {
        self.clauses.push((attribute.into(), expected.into()));
        self
    }

    /// Parse and add an `attribute=value` expression.
    pub fn and_expr(self, expr: &str) -> Result<Self, RosterError> {
        let (attribute, value) = split_expr(expr)?;
        Ok(self.eq(attribute, value))
    }

    pub fn clauses(&self) -> &[(String, String)] {
        &self.clauses
    }

    /// Exact string equality per clause; a missing attribute compares as "".
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses
            .iter()
            .all(|(attribute, expected)| record.value(attribute) == expected)
    }
}

impl FromStr for Predicate {
    type Err = RosterError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        Predicate::new().and_expr(expr)
    }
}

fn split_expr(expr: &str) -> Result<(&str, &str), RosterError> {
    let Some(pos) = expr.find('=') else {
        return Err(RosterError::InvalidPredicate(expr.to_string()));
    };
    let attribute = expr[..pos].trim();
    if attribute.is_empty() {
        return Err(RosterError::InvalidPredicate(expr.to_string()));
    }
    // Value is taken verbatim after the first '='; it may be empty or contain '='.
    Ok((attribute, &expr[pos + 1..]))
}
