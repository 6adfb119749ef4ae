use crate::error::DbError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core_types::QueryParam;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgArguments, PgPool, PgRow, Postgres};
use sqlx::query::Query as SqlxQuery;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use uuid::Uuid;

/// A row as the store hands it over: column name -> value.
pub type JsonRow = serde_json::Map<String, JsonValue>;

/// The relational store, reduced to the one capability the query layer needs.
///
/// Implementations must return rows in the order the store produced them.
#[async_trait]
pub trait Store: Send + Sync {
    async fn fetch(&self, statement: &str, params: &[QueryParam]) -> Result<Vec<JsonRow>, DbError>;
}

/// The PostgreSQL store. Holds the pool; every call checks out its own connection.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn fetch(&self, statement: &str, params: &[QueryParam]) -> Result<Vec<JsonRow>, DbError> {
        let query = bind_params(sqlx::query(statement), params);
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_json).collect()
    }
}

fn bind_params<'q>(
    mut query: SqlxQuery<'q, Postgres, PgArguments>,
    params: &[QueryParam],
) -> SqlxQuery<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            QueryParam::Bool(value) => query.bind(*value),
            QueryParam::Int(value) => query.bind(*value),
            QueryParam::Float(value) => query.bind(*value),
            QueryParam::Text(value) => query.bind(value.clone()),
        };
    }
    query
}

fn row_to_json(row: &PgRow) -> Result<JsonRow, DbError> {
    let mut object = JsonRow::new();
    for column in row.columns() {
        let value = column_to_json(row, column.ordinal(), column.name(), column.type_info().name())?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

/// Maps one PostgreSQL value to JSON. NUMERIC becomes a decimal string so no precision is
/// lost; timestamps become RFC 3339 strings in UTC.
fn column_to_json(row: &PgRow, index: usize, column: &str, type_name: &str) -> Result<JsonValue, DbError> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(JsonValue::Null);
    }

    let value = match type_name {
        "BOOL" => JsonValue::from(row.try_get::<bool, _>(index)?),
        "INT2" => JsonValue::from(row.try_get::<i16, _>(index)?),
        "INT4" => JsonValue::from(row.try_get::<i32, _>(index)?),
        "INT8" => JsonValue::from(row.try_get::<i64, _>(index)?),
        "FLOAT4" => JsonValue::from(row.try_get::<f32, _>(index)?),
        "FLOAT8" => JsonValue::from(row.try_get::<f64, _>(index)?),
        "NUMERIC" => JsonValue::from(row.try_get::<Decimal, _>(index)?.to_string()),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => JsonValue::from(row.try_get::<String, _>(index)?),
        "UUID" => JsonValue::from(row.try_get::<Uuid, _>(index)?.to_string()),
        "TIMESTAMPTZ" => JsonValue::from(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339()),
        "TIMESTAMP" => JsonValue::from(
            row.try_get::<NaiveDateTime, _>(index)?
                .and_utc()
                .to_rfc3339(),
        ),
        "DATE" => JsonValue::from(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "JSON" | "JSONB" => row.try_get::<JsonValue, _>(index)?,
        other => {
            return Err(DbError::UnsupportedColumnType {
                column: column.to_string(),
                type_name: other.to_string(),
            });
        }
    };
    Ok(value)
}
