use log::{error, info};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::fs;
use std::path::Path;

use crate::config::AppConfig;

pub async fn connect_db(config: &AppConfig) -> DatabaseConnection {
    let url = config.database_url();
    ensure_sqlite_dir(&url);
    let db = Database::connect(&url)
        .await
        .unwrap_or_else(|e| panic!("db connect failed: {}", e));
    init_schema(&db).await;
    db
}

fn ensure_sqlite_dir(url: &str) {
    let Some(rest) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return;
    };
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.starts_with(":memory:") {
        return;
    }
    if let Some(parent) = Path::new(path).parent() {
        let _ = fs::create_dir_all(parent);
    }
}

/// Creates the SQLite schema on first start. Other backends manage their own schema.
pub async fn init_schema(db: &DatabaseConnection) {
    let backend = db.get_database_backend();
    if backend != DatabaseBackend::Sqlite {
        return;
    }

    let exists_stmt = Statement::from_string(
        backend,
        "SELECT name FROM sqlite_master WHERE type='table' AND name='users' LIMIT 1",
    );
    let exists = db.query_one(exists_stmt).await.ok().flatten().is_some();
    if exists {
        return;
    }

    info!("initialising sqlite schema");
    let sql = include_str!("../schema-sqlite.sql");
    for stmt in split_sql(sql) {
        if let Err(e) = db.execute(Statement::from_string(backend, stmt.clone())).await {
            error!("schema statement failed: {} (sql={})", e, stmt);
        }
    }
}

fn split_sql(input: &str) -> Vec<String> {
    let mut buf = String::new();
    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }
        buf.push_str(line);
        buf.push('\n');
    }
    buf.split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sql_drops_comments_and_blank_statements() {
        let sql = "-- header\nCREATE TABLE a (x INTEGER);\n\n-- next\nCREATE TABLE b (y TEXT);\n;";
        let stmts = split_sql(sql);
        assert_eq!(stmts, vec!["CREATE TABLE a (x INTEGER)", "CREATE TABLE b (y TEXT)"]);
    }

    #[test]
    fn bundled_schema_defines_both_tables() {
        let stmts = split_sql(include_str!("../schema-sqlite.sql"));
        assert!(stmts.iter().any(|s| s.contains("CREATE TABLE IF NOT EXISTS users")));
        assert!(stmts.iter().any(|s| s.contains("CREATE TABLE IF NOT EXISTS connections")));
    }
}
