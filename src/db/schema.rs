use sqlx::SqlitePool;

pub const SQLITE_SCHEMA: &str = include_str!("../../sql/sqlite_schema.sql");

/// Creates the course store tables on a SQLite pool. Safe to run repeatedly.
pub async fn apply_sqlite_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for stmt in split_sql_statements(SQLITE_SCHEMA) {
        sqlx::query(&stmt).execute(pool).await?;
    }
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;

    for line in sql.lines() {
        if line.trim_start().starts_with("--") {
            continue;
        }
        for ch in line.chars() {
            match ch {
                '\'' => in_single_quote = !in_single_quote,
                ';' if !in_single_quote => {
                    let stmt = current.trim();
                    if !stmt.is_empty() {
                        statements.push(stmt.to_string());
                    }
                    current.clear();
                    continue;
                }
                _ => {}
            }
            current.push(ch);
        }
        current.push('\n');
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_splits_into_statements() {
        let statements = split_sql_statements(SQLITE_SCHEMA);
        assert_eq!(statements.len(), 5);
        assert!(statements.iter().all(|s| s.starts_with("CREATE")));
    }

    #[test]
    fn test_semicolons_inside_quotes_are_kept() {
        let statements = split_sql_statements("INSERT INTO t VALUES ('a;b');\n-- note\nSELECT 1;");
        assert_eq!(statements, vec!["INSERT INTO t VALUES ('a;b')", "SELECT 1"]);
    }
}
