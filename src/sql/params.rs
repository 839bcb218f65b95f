//! Named parameter bookkeeping and conversion of serde_json::Value to types sqlx can bind.

use crate::error::AppError;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

/// Placeholder → value bindings for one builder, in binding order.
#[derive(Clone, Debug, Default)]
pub struct Params {
    bound: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    /// Record `value` under a fresh placeholder (`:p1`, `:p2`, ...) and return the placeholder.
    pub fn push(&mut self, value: Value) -> String {
        let key = format!(":p{}", self.bound.len() + 1);
        self.bound.push((key.clone(), value));
        key
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.bound.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Rewrite named placeholders in `sql` to `?` markers, returning the values in the order
    /// the placeholders appear. Bindings not referenced by `sql` are left out.
    pub fn positional(&self, sql: &str) -> Result<(String, Vec<Value>), AppError> {
        let bytes = sql.as_bytes();
        let mut out = String::with_capacity(sql.len());
        let mut values = Vec::new();
        let mut last = 0;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b':' && bytes.get(i + 1) == Some(&b'p') {
                let mut end = i + 2;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > i + 2 {
                    let token = &sql[i..end];
                    let value = self.get(token).ok_or_else(|| {
                        AppError::InvalidArgument(format!("unbound placeholder: {}", token))
                    })?;
                    out.push_str(&sql[last..i]);
                    out.push('?');
                    values.push(value.clone());
                    last = end;
                    i = end;
                    continue;
                }
            }
            i += 1;
        }
        out.push_str(&sql[last..]);
        Ok((out, values))
    }
}

/// A value that can be bound to a MySQL statement. Converts from serde_json::Value.
#[derive(Clone, Debug, PartialEq)]
pub enum MySqlBindValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    Json(Value),
}

impl MySqlBindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => MySqlBindValue::Null,
            Value::Bool(b) => MySqlBindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    MySqlBindValue::I64(i)
                } else if let Some(u) = n.as_u64() {
                    MySqlBindValue::U64(u)
                } else {
                    MySqlBindValue::F64(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => MySqlBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => MySqlBindValue::Json(v.clone()),
        }
    }

    pub fn bind_to<'q>(
        self,
        query: Query<'q, MySql, MySqlArguments>,
    ) -> Query<'q, MySql, MySqlArguments> {
        match self {
            MySqlBindValue::Null => query.bind(None::<String>),
            MySqlBindValue::Bool(b) => query.bind(b),
            MySqlBindValue::I64(n) => query.bind(n),
            MySqlBindValue::U64(n) => query.bind(n),
            MySqlBindValue::F64(n) => query.bind(n),
            MySqlBindValue::String(s) => query.bind(s),
            MySqlBindValue::Json(v) => query.bind(sqlx::types::Json(v)),
        }
    }
}
