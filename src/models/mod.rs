// src/models/mod.rs

use std::fmt;

use serde::{Serialize, Serializer};

pub const ALL_CITIES: &str = "All Cities";

// ───────────────────────────────────────
// Scope (the city selector)
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    City(String),
}

impl Scope {
    /// `None`, blank and `"All Cities"` all mean unscoped.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_CITIES) => Scope::All,
            Some(city) => Scope::City(city.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Scope::All => ALL_CITIES,
            Scope::City(city) => city,
        }
    }

    pub fn city(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::City(city) => Some(city),
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ───────────────────────────────────────
// Tabular query results
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(v) => Some(*v as f64),
            Scalar::Real(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Integer(v) => write!(f, "{v}"),
            Scalar::Real(v) => write!(f, "{v}"),
            Scalar::Text(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl ResultSet {
    /// No rows, or a lone all-NULL row (an aggregate over nothing).
    pub fn is_vacant(&self) -> bool {
        match self.rows.as_slice() {
            [] => true,
            [only] => only.iter().all(Scalar::is_null),
            _ => false,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

// ───────────────────────────────────────
// Parameterized SQL
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl BoundQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into(), params: Vec::new() }
    }

    pub fn bind(mut self, value: impl Into<String>) -> Self {
        self.params.push(value.into());
        self
    }
}
