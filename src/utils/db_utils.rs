use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use sqlx::MySqlPool;

use crate::error::AppError;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build a partial UPDATE from a patch struct
/// ===============================
/// `patch` is serialized to a JSON object; `None` fields should be skipped with
/// `#[serde(skip_serializing_if = "Option::is_none")]`. Only `columns` may be set.
pub fn build_update_sql<P: Serialize>(
    table: &str,
    patch: &P,
    columns: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, AppError> {
    let payload = serde_json::to_value(patch)
        .map_err(|e| AppError::bad_request(format!("Invalid payload: {e}")))?;
    let obj = payload
        .as_object()
        .ok_or_else(|| AppError::bad_request("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(AppError::bad_request("No fields provided for update"));
    }

    if let Some(unknown) = obj.keys().find(|k| !columns.contains(&k.as_str())) {
        return Err(AppError::bad_request(format!("Field '{unknown}' cannot be updated")));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    for value in obj.values() {
        values.push(to_sql_value(value)?);
    }

    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate { sql, values })
}

fn to_sql_value(value: &Value) -> Result<SqlValue, AppError> {
    Ok(match value {
        Value::String(s) => {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                SqlValue::Date(d)
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                SqlValue::DateTime(dt)
            } else {
                SqlValue::String(s.clone())
            }
        }
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                SqlValue::U64(u)
            } else if let Some(i) = n.as_i64() {
                SqlValue::I64(i)
            } else if let Some(f) = n.as_f64() {
                SqlValue::F64(f)
            } else {
                return Err(AppError::bad_request("Unsupported number"));
            }
        }
        Value::Bool(b) => SqlValue::Bool(*b),
        Value::Null => SqlValue::Null,
        _ => return Err(AppError::bad_request("Unsupported JSON value type")),
    })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Patch {
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        expense_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        expense_name: Option<String>,
    }

    #[test]
    fn builds_set_clause_for_present_fields() {
        let patch = Patch {
            amount: Some(12.5),
            expense_date: NaiveDate::from_ymd_opt(2025, 7, 1),
            expense_name: None,
        };
        let update = build_update_sql(
            "expenses",
            &patch,
            &["amount", "expense_date", "expense_name"],
            "id",
            9,
        )
        .unwrap();
        assert_eq!(
            update.sql,
            "UPDATE expenses SET amount = ?, expense_date = ? WHERE id = ?"
        );
        assert_eq!(
            update.values,
            vec![
                SqlValue::F64(12.5),
                SqlValue::Date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()),
                SqlValue::U64(9),
            ]
        );
    }

    #[test]
    fn rejects_empty_and_unlisted_fields() {
        let empty = Patch {
            amount: None,
            expense_date: None,
            expense_name: None,
        };
        assert!(build_update_sql("expenses", &empty, &["amount"], "id", 1).is_err());

        let named = Patch {
            amount: None,
            expense_date: None,
            expense_name: Some("Thread".into()),
        };
        assert!(build_update_sql("expenses", &named, &["amount"], "id", 1).is_err());
    }
}
