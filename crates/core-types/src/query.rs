use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single positional parameter bound to a statement placeholder (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParam {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        QueryParam::Text(value.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        QueryParam::Text(value)
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        QueryParam::Int(value)
    }
}

impl From<i32> for QueryParam {
    fn from(value: i32) -> Self {
        QueryParam::Int(i64::from(value))
    }
}

impl From<f64> for QueryParam {
    fn from(value: f64) -> Self {
        QueryParam::Float(value)
    }
}

impl From<bool> for QueryParam {
    fn from(value: bool) -> Self {
        QueryParam::Bool(value)
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParam::Bool(v) => write!(f, "{v}"),
            QueryParam::Int(v) => write!(f, "{v}"),
            QueryParam::Float(v) => write!(f, "{v}"),
            QueryParam::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// An immutable read query: the statement text and its ordered parameters.
///
/// The statement is store-agnostic as far as this type is concerned; whether the parameter
/// count matches the placeholders is for the store to decide.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: Cow<'static, str>,
    params: Vec<QueryParam>,
}

impl Query {
    /// A query without parameters.
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// A query with positional parameters, bound in the given order.
    pub fn with_params<I, P>(text: impl Into<Cow<'static, str>>, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<QueryParam>,
    {
        Self {
            text: text.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }
}
