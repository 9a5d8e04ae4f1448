use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use nw_core::{Article, ArticleStorage, Category, Error, InsertReport, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::StorageBackend;

const DEFAULT_DB_PATH: &str = "articles.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(trim(title)) > 0),
        description TEXT NOT NULL,
        url TEXT NOT NULL CHECK (length(trim(url)) > 0),
        image_url TEXT,
        category TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_articles_category_created
        ON articles (category, created_at)
    "#,
];

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be writable (default ./articles.db)"
    }

    async fn open(location: Option<&str>) -> Result<Self> {
        let path = location
            .map(|l| l.trim_start_matches("sqlite://").trim_start_matches("sqlite:"))
            .unwrap_or(DEFAULT_DB_PATH);
        Self::new_with_path(Path::new(path)).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    // fixed width so text ordering matches time ordering
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse date '{}': {}", raw, e)))
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let get = |column: &str| -> Result<String> {
        row.try_get::<String, _>(column)
            .map_err(|e| Error::Storage(format!("Failed to read column {}: {}", column, e)))
    };

    Ok(Article {
        title: get("title")?,
        description: get("description")?,
        url: get("url")?,
        image_url: row
            .try_get::<Option<String>, _>("image_url")
            .map_err(|e| Error::Storage(format!("Failed to read column image_url: {}", e)))?,
        category: get("category")?.parse::<Category>()?,
        created_at: parse_timestamp(&get("created_at")?)?,
        updated_at: parse_timestamp(&get("updated_at")?)?,
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert_many(&self, articles: &[Article]) -> Result<InsertReport> {
        let mut report = InsertReport::default();

        for (index, article) in articles.iter().enumerate() {
            if let Err(reason) = article.validate() {
                report.record_failure(index, article, reason);
                continue;
            }

            let inserted = sqlx::query(
                r#"
                INSERT INTO articles
                (title, description, url, image_url, category, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&article.title)
            .bind(&article.description)
            .bind(&article.url)
            .bind(article.image_url.as_deref())
            .bind(article.category.as_str())
            .bind(timestamp(&article.created_at))
            .bind(timestamp(&article.updated_at))
            .execute(&self.pool)
            .await;

            match inserted {
                Ok(_) => report.inserted += 1,
                // a constraint on one row is that row's problem
                Err(sqlx::Error::Database(e)) => {
                    debug!("Rejected article #{} ({}): {}", index, article.url, e);
                    report.record_failure(index, article, e.to_string());
                }
                Err(e) => {
                    return Err(Error::Storage(format!("Failed to store articles: {}", e)));
                }
            }
        }

        Ok(report)
    }

    async fn get_by_category(&self, category: Category, limit: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT title, description, url, image_url, category, created_at, updated_at
            FROM articles
            WHERE category = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(category.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to get articles by category: {}", e)))?;

        rows.iter().map(row_to_article).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert_eq!(storage.get_db_path(), db_path.as_path());

        let batch = vec![
            Article::new("Kept", "snippet", "https://example.com/1", None, Category::Science),
            Article::new("", "snippet", "https://example.com/2", None, Category::Science),
            Article::new(
                "Also kept",
                "snippet",
                "https://example.com/1",
                Some("https://example.com/1.png".to_string()),
                Category::Science,
            ),
        ];

        let report = storage.insert_many(&batch).await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);

        let stored = storage.get_by_category(Category::Science, 10).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title, "Also kept");
        assert_eq!(stored[0].image_url.as_deref(), Some("https://example.com/1.png"));
        assert_eq!(stored[1].title, "Kept");

        let other = storage.get_by_category(Category::Sports, 10).await.unwrap();
        assert!(other.is_empty());
    }
}
