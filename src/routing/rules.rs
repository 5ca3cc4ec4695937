//! Routing rule string parsing.
//!
//! Format: `[{sender:}]{id,id,...}[;...]`. A rule without a sender feeds the
//! default (empty) sender entry.

use std::num::ParseIntError;

use thiserror::Error;

use crate::routing::table::{append_unique, RoutingTable};

/// Errors produced while parsing a rule string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    /// More than one `:` in a single rule.
    #[error("invalid rule '{0}'")]
    InvalidRule(String),

    /// A destination id that is not a 64-bit integer.
    #[error("invalid destination id '{value}': {source}")]
    InvalidId {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parse a full rule string into a routing table.
pub fn parse_rules(input: &str) -> Result<RoutingTable, RuleError> {
    let entries = input
        .split(';')
        .map(parse_rule)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RoutingTable::from_entries(entries))
}

fn parse_rule(rule: &str) -> Result<(String, Vec<i64>), RuleError> {
    let parts: Vec<&str> = rule.split(':').collect();
    match parts.as_slice() {
        [ids] => Ok((String::new(), parse_ids(ids)?)),
        [sender, ids] => Ok((sender.trim().to_string(), parse_ids(ids)?)),
        _ => Err(RuleError::InvalidRule(rule.to_string())),
    }
}

fn parse_ids(input: &str) -> Result<Vec<i64>, RuleError> {
    let mut ids = Vec::new();
    for raw in input.split(',') {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        let id = value.parse::<i64>().map_err(|source| RuleError::InvalidId {
            value: value.to_string(),
            source,
        })?;
        append_unique(&mut ids, [id]);
    }
    Ok(ids)
}
