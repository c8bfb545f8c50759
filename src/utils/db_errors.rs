//! Classification of MySQL errors the handlers react to.

/// SQLSTATE for integrity violations (duplicate key, foreign key).
const INTEGRITY_VIOLATION: &str = "23000";
/// SQLSTATE for "table doesn't exist".
const UNDEFINED_TABLE: &str = "42S02";

pub fn is_duplicate(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(INTEGRITY_VIOLATION),
        _ => false,
    }
}

/// True when the query hit a table that was never created.
pub fn is_missing_table(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            missing_table_signature(db_err.code().as_deref(), db_err.message())
        }
        _ => false,
    }
}

fn missing_table_signature(code: Option<&str>, message: &str) -> bool {
    code == Some(UNDEFINED_TABLE) || message.contains("doesn't exist")
}

/// Treats an absent optional table as an empty result set.
pub fn empty_if_missing<T>(
    result: Result<Vec<T>, sqlx::Error>,
    table: &str,
) -> Result<Vec<T>, sqlx::Error> {
    match result {
        Err(e) if is_missing_table(&e) => {
            tracing::warn!(table, "Table missing, returning no rows");
            Ok(Vec::new())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_missing_table() {
        assert!(missing_table_signature(Some("42S02"), "anything"));
        assert!(missing_table_signature(
            None,
            "Table 'atelier.daily_tasks' doesn't exist"
        ));
        assert!(!missing_table_signature(Some("23000"), "Duplicate entry"));
    }

    #[test]
    fn other_errors_are_kept() {
        assert!(!is_missing_table(&sqlx::Error::RowNotFound));
        assert!(!is_duplicate(&sqlx::Error::PoolTimedOut));
        let kept = empty_if_missing::<u64>(Err(sqlx::Error::RowNotFound), "expenses");
        assert!(kept.is_err());
        let rows = empty_if_missing(Ok(vec![1u64, 2]), "expenses").unwrap();
        assert_eq!(rows, vec![1, 2]);
    }
}
