//! Query filters.
//!
//! The store supports exactly three shapes: exact equality on a dotted field
//! path, conjunction of two filters, and set membership. That closed set is
//! all the traversal needs; there is no general query language here.

use serde_json::Value;

use crate::document::{value_at, Document};

#[derive(Debug, Clone)]
pub enum Filter {
    Eq { path: String, value: Value },
    And(Box<Filter>, Box<Filter>),
    In { path: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn and(a: Self, b: Self) -> Self {
        Self::And(Box::new(a), Box::new(b))
    }

    pub fn is_in(path: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In {
            path: path.into(),
            values,
        }
    }

    /// A document with the path absent matches nothing.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Eq { path, value } => value_at(doc, path).map_or(false, |v| v == value),
            Self::And(a, b) => a.matches(doc) && b.matches(doc),
            Self::In { path, values } => {
                value_at(doc, path).map_or(false, |v| values.contains(v))
            }
        }
    }
}
