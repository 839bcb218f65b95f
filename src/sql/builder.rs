//! Fluent query builder producing parameterized SELECT, INSERT, UPDATE and DELETE statements.

use crate::error::AppError;
use crate::sql::ident::identifier;
use crate::sql::operator::{Direction, Operator};
use crate::sql::params::{MySqlBindValue, Params};
use crate::sql::row::{row_to_map, Row};
use crate::store::Database;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

/// Final SQL with positional markers and the values to bind, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn from_named(sql: &str, params: &Params) -> Result<Self, AppError> {
        let (sql, params) = params.positional(sql)?;
        Ok(Statement { sql, params })
    }

    pub fn query(&self) -> Query<'_, MySql, MySqlArguments> {
        self.params
            .iter()
            .fold(sqlx::query::<MySql>(&self.sql), |q, v| {
                MySqlBindValue::from_json(v).bind_to(q)
            })
    }
}

/// Accumulates one query against a single table. Predicates are ANDed in the order added.
pub struct QueryBuilder<'db> {
    db: &'db Database,
    table: String,
    select: Vec<String>,
    wheres: Vec<String>,
    params: Params,
    order: Option<(String, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<'db> QueryBuilder<'db> {
    pub fn new(db: &'db Database, table: &str) -> Result<Self, AppError> {
        Ok(QueryBuilder {
            db,
            table: identifier(table)?,
            select: vec!["*".to_string()],
            wheres: Vec::new(),
            params: Params::new(),
            order: None,
            limit: None,
            offset: None,
        })
    }

    /// `*` or a comma-separated column list. Replaces any previous selection.
    pub fn select(mut self, columns: &str) -> Result<Self, AppError> {
        let columns = columns.trim();
        self.select = if columns == "*" {
            vec!["*".to_string()]
        } else {
            columns
                .split(',')
                .map(identifier)
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(self)
    }

    /// `field = value`.
    pub fn where_eq(self, field: &str, value: impl Into<Value>) -> Result<Self, AppError> {
        self.where_op(field, "=", value)
    }

    /// `field <op> value`. IN and NOT IN need a non-empty JSON array; each element gets its own placeholder.
    pub fn where_op(mut self, field: &str, op: &str, value: impl Into<Value>) -> Result<Self, AppError> {
        let op: Operator = op.parse()?;
        let col = identifier(field)?;
        let value = value.into();

        if op.takes_list() {
            let items = match value {
                Value::Array(items) if !items.is_empty() => items,
                _ => {
                    return Err(AppError::InvalidArgument(format!(
                        "{} requires a non-empty array.",
                        op
                    )))
                }
            };
            let placeholders: Vec<String> = items.into_iter().map(|v| self.params.push(v)).collect();
            self.wheres
                .push(format!("{} {} ({})", col, op, placeholders.join(", ")));
            return Ok(self);
        }

        let ph = self.params.push(value);
        self.wheres.push(format!("{} {} {}", col, op, ph));
        Ok(self)
    }

    /// Equality on every pair, in iteration order.
    pub fn where_all<I, K, V>(self, pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .try_fold(self, |q, (k, v)| q.where_eq(k.as_ref(), v))
    }

    /// Anything other than "DESC" (case-insensitive) sorts ascending.
    pub fn order_by(mut self, column: &str, direction: &str) -> Result<Self, AppError> {
        self.order = Some((identifier(column)?, Direction::parse_lenient(direction)));
        Ok(self)
    }

    /// Negative values are floored to zero.
    pub fn limit(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit.max(0) as u64);
        self.offset = Some(offset.max(0) as u64);
        self
    }

    /// Current (limit, offset).
    pub fn pagination(&self) -> (Option<u64>, Option<u64>) {
        (self.limit, self.offset)
    }

    pub fn has_filters(&self) -> bool {
        !self.wheres.is_empty()
    }

    pub fn select_statement(&self) -> Result<Statement, AppError> {
        Statement::from_named(&self.select_sql(self.limit, self.offset), &self.params)
    }

    /// SELECT used by `first`: limit 1 unless a limit is already set.
    pub fn first_statement(&self) -> Result<Statement, AppError> {
        let (limit, offset) = match self.limit {
            Some(_) => (self.limit, self.offset),
            None => (Some(1), Some(0)),
        };
        Statement::from_named(&self.select_sql(limit, offset), &self.params)
    }

    pub fn insert_statement<I, K, V>(&mut self, data: I) -> Result<Statement, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        for (k, v) in data {
            cols.push(identifier(k.as_ref())?);
            vals.push(self.params.push(v.into()));
        }
        if cols.is_empty() {
            return Err(AppError::InvalidArgument("Insert data cannot be empty.".into()));
        }
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            cols.join(", "),
            vals.join(", ")
        );
        Statement::from_named(&sql, &self.params)
    }

    /// Refuses to build an UPDATE without at least one WHERE predicate.
    pub fn update_statement<I, K, V>(&mut self, data: I) -> Result<Statement, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let data: Vec<(K, V)> = data.into_iter().collect();
        if data.is_empty() {
            return Err(AppError::InvalidArgument("Update data cannot be empty.".into()));
        }
        if !self.has_filters() {
            return Err(AppError::UnsafeOperation("Refusing to UPDATE without WHERE.".into()));
        }
        let mut sets = Vec::with_capacity(data.len());
        for (k, v) in data {
            let col = identifier(k.as_ref())?;
            let ph = self.params.push(v.into());
            sets.push(format!("{} = {}", col, ph));
        }
        let sql = format!("UPDATE {} SET {}{}", self.table, sets.join(", "), self.where_sql());
        Statement::from_named(&sql, &self.params)
    }

    /// Refuses to build a DELETE without at least one WHERE predicate.
    pub fn delete_statement(&self) -> Result<Statement, AppError> {
        if !self.has_filters() {
            return Err(AppError::UnsafeOperation("Refusing to DELETE without WHERE.".into()));
        }
        let sql = format!("DELETE FROM {}{}", self.table, self.where_sql());
        Statement::from_named(&sql, &self.params)
    }

    /// Run the SELECT and return all rows.
    pub async fn get(&self) -> Result<Vec<Row>, AppError> {
        let stmt = self.select_statement()?;
        self.fetch_all(&stmt).await
    }

    /// Run the SELECT and return the first row, if any. Limit and offset are left as they were.
    pub async fn first(&self) -> Result<Option<Row>, AppError> {
        let stmt = self.first_statement()?;
        Ok(self.fetch_all(&stmt).await?.into_iter().next())
    }

    /// Insert one row and return the generated id as reported by the server.
    pub async fn insert<I, K, V>(mut self, data: I) -> Result<String, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let stmt = self.insert_statement(data)?;
        tracing::debug!(sql = %stmt.sql, params = ?stmt.params, "insert");
        let conn = self.db.connection().await?;
        let mut conn = conn.lock().await;
        let result = stmt.query().execute(&mut *conn).await?;
        Ok(result.last_insert_id().to_string())
    }

    /// Update matching rows; returns the affected row count.
    pub async fn update<I, K, V>(mut self, data: I) -> Result<u64, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let stmt = self.update_statement(data)?;
        self.execute(&stmt).await
    }

    /// Delete matching rows; returns the affected row count.
    pub async fn delete(self) -> Result<u64, AppError> {
        let stmt = self.delete_statement()?;
        self.execute(&stmt).await
    }

    fn select_sql(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.select.join(", "), self.table);
        sql.push_str(&self.where_sql());
        if let Some((col, dir)) = &self.order {
            sql.push_str(&format!(" ORDER BY {} {}", col, dir.as_sql()));
        }
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
            if let Some(m) = offset.filter(|m| *m > 0) {
                sql.push_str(&format!(" OFFSET {}", m));
            }
        }
        sql
    }

    fn where_sql(&self) -> String {
        if self.wheres.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.wheres.join(" AND "))
        }
    }

    async fn fetch_all(&self, stmt: &Statement) -> Result<Vec<Row>, AppError> {
        tracing::debug!(sql = %stmt.sql, params = ?stmt.params, "query");
        let conn = self.db.connection().await?;
        let mut conn = conn.lock().await;
        let rows = stmt.query().fetch_all(&mut *conn).await?;
        Ok(rows.iter().map(row_to_map).collect())
    }

    async fn execute(&self, stmt: &Statement) -> Result<u64, AppError> {
        tracing::debug!(sql = %stmt.sql, params = ?stmt.params, "execute");
        let conn = self.db.connection().await?;
        let mut conn = conn.lock().await;
        let result = stmt.query().execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }
}
