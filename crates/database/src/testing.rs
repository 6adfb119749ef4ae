//! A scripted, in-memory `Store` for tests.
//!
//! Statements are matched by exact text. Every call is recorded so tests can assert on
//! what reached the store and in which order.

use crate::error::DbError;
use crate::store::{JsonRow, Store};
use async_trait::async_trait;
use core_types::QueryParam;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type Handler = Box<dyn Fn(&[QueryParam]) -> Result<Vec<JsonRow>, DbError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub statement: String,
    pub params: Vec<QueryParam>,
}

#[derive(Default)]
pub struct ScriptedStore {
    handlers: HashMap<String, Handler>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `statement` with the same rows every time.
    pub fn respond(self, statement: &str, rows: Vec<JsonRow>) -> Self {
        self.respond_with(statement, move |_| Ok(rows.clone()))
    }

    /// Fails `statement` with a backend error carrying `message`.
    pub fn fail(self, statement: &str, message: &str) -> Self {
        let message = message.to_string();
        self.respond_with(statement, move |_| Err(DbError::Backend(message.clone())))
    }

    pub fn respond_with<F>(mut self, statement: &str, handler: F) -> Self
    where
        F: Fn(&[QueryParam]) -> Result<Vec<JsonRow>, DbError> + Send + Sync + 'static,
    {
        self.handlers.insert(statement.to_string(), Box::new(handler));
        self
    }

    /// Answers `page_statement` by slicing `rows` with its `(limit, offset)` params and
    /// `count_statement` with `{ "total": rows.len() }`.
    pub fn table(self, count_statement: &str, page_statement: &str, rows: Vec<JsonRow>) -> Self {
        let total = rows.len();
        self.respond(count_statement, vec![row(serde_json::json!({ "total": total }))])
            .respond_with(page_statement, move |params| Ok(window(&rows, params)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, statement: &str) -> usize {
        self.calls().iter().filter(|c| c.statement == statement).count()
    }
}

#[async_trait]
impl Store for ScriptedStore {
    async fn fetch(&self, statement: &str, params: &[QueryParam]) -> Result<Vec<JsonRow>, DbError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                statement: statement.to_string(),
                params: params.to_vec(),
            });
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.handlers.get(statement) {
            Some(handler) => handler(params),
            None => Err(DbError::Backend(format!("no scripted response for: {statement}"))),
        }
    }
}

/// Builds a `JsonRow` from a `json!({ .. })` literal.
pub fn row(value: JsonValue) -> JsonRow {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("a row must be a JSON object, got {other}"),
    }
}

/// Applies `LIMIT $1 OFFSET $2` semantics to an in-memory table.
pub fn window(rows: &[JsonRow], params: &[QueryParam]) -> Vec<JsonRow> {
    let as_usize = |param: Option<&QueryParam>| match param {
        Some(QueryParam::Int(v)) => usize::try_from(*v).unwrap_or(0),
        _ => 0,
    };
    let limit = as_usize(params.first());
    let offset = as_usize(params.get(1));
    rows.iter().skip(offset).take(limit).cloned().collect()
}
