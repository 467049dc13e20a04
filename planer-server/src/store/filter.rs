//! Typed list filters, rendered to OData `$filter` expressions.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use super::Row;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(u64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl From<u64> for Literal {
    fn from(n: u64) -> Self {
        Literal::Number(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(dt: NaiveDateTime) -> Self {
        Literal::DateTime(dt)
    }
}

impl Literal {
    fn to_odata(&self) -> String {
        match self {
            Literal::Number(n) => n.to_string(),
            Literal::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Literal::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Literal::DateTime(dt) => format!("datetime'{}'", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }

    /// Order of a stored value relative to this literal, if comparable.
    fn compare(&self, value: &Value) -> Option<Ordering> {
        match (self, value) {
            (Literal::Number(n), Value::Number(v)) => v.as_f64()?.partial_cmp(&(*n as f64)),
            (Literal::Number(n), Value::String(s)) => s.parse::<f64>().ok()?.partial_cmp(&(*n as f64)),
            (Literal::Text(t), Value::String(s)) => Some(s.as_str().cmp(t.as_str())),
            (Literal::Bool(b), Value::Bool(v)) => Some(v.cmp(b)),
            (Literal::Bool(b), Value::Number(v)) => Some((v.as_f64()? != 0.0).cmp(b)),
            (Literal::DateTime(dt), Value::String(s)) => Some(parse_stored_datetime(s)?.cmp(dt)),
            _ => None,
        }
    }
}

/// Stored dates come as `2026-03-10T00:00:00Z` or plain `2026-03-10`.
fn parse_stored_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Some(prefix) = s.get(..19) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt);
        }
    }
    let date = NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Literal),
    Ge(&'static str, Literal),
    Le(&'static str, Literal),
    And(Box<Filter>, Box<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Literal>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn ge(field: &'static str, value: impl Into<Literal>) -> Self {
        Filter::Ge(field, value.into())
    }

    pub fn le(field: &'static str, value: impl Into<Literal>) -> Self {
        Filter::Le(field, value.into())
    }

    pub fn and(self, other: Filter) -> Self {
        Filter::And(Box::new(self), Box::new(other))
    }

    pub fn to_odata(&self) -> String {
        match self {
            Filter::Eq(field, lit) => format!("{} eq {}", field, lit.to_odata()),
            Filter::Ge(field, lit) => format!("{} ge {}", field, lit.to_odata()),
            Filter::Le(field, lit) => format!("{} le {}", field, lit.to_odata()),
            Filter::And(a, b) => format!("{} and {}", a.to_odata(), b.to_odata()),
        }
    }

    /// Evaluate against a row. Missing or incomparable fields never match.
    pub fn matches(&self, row: &Row) -> bool {
        let cmp = |field: &str, lit: &Literal| row.get(field).and_then(|v| lit.compare(v));

        match self {
            Filter::Eq(field, lit) => cmp(field, lit) == Some(Ordering::Equal),
            Filter::Ge(field, lit) => matches!(cmp(field, lit), Some(Ordering::Greater | Ordering::Equal)),
            Filter::Le(field, lit) => matches!(cmp(field, lit), Some(Ordering::Less | Ordering::Equal)),
            Filter::And(a, b) => a.matches(row) && b.matches(row),
        }
    }
}
