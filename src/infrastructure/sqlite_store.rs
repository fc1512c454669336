use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    error::TodoError,
    id::DocumentId,
    repository::TodoStore,
    todo::Todo,
};

/// Persistent store over a SQLite `todos` table. Ids are UUID v4 strings.
#[derive(Clone)]
pub struct SqliteTodoStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoStore {
    /// Opens the pool and verifies the database answers before returning.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = if is_memory_url(database_url) {
            // every connection to :memory: is a separate database; pin a single one
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options
            .connect(database_url)
            .await
            .with_context(|| format!("failed to connect to {database_url}"))?;
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("database did not answer ping")?;
        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

pub fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    type Id = DocumentId;

    async fn init(&self) -> Result<(), TodoError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, body: String) -> Result<Todo<DocumentId>, TodoError> {
        let id = DocumentId::generate();
        sqlx::query("INSERT INTO todos (id, body, completed) VALUES (?1, ?2, 0)")
            .bind(id.to_string())
            .bind(&body)
            .execute(&*self.pool)
            .await?;
        Ok(Todo::new(id, body))
    }

    async fn list(&self) -> Result<Vec<Todo<DocumentId>>, TodoError> {
        let rows = sqlx::query("SELECT id, body, completed FROM todos")
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn find(&self, id: &DocumentId) -> Result<Todo<DocumentId>, TodoError> {
        let row = sqlx::query("SELECT id, body, completed FROM todos WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        match row {
            Some(row) => row_to_todo(row),
            None => Err(TodoError::NotFound(id.to_string())),
        }
    }

    async fn toggle(&self, id: &DocumentId) -> Result<bool, TodoError> {
        // single statement so concurrent toggles cannot read the same old value
        let row = sqlx::query("UPDATE todos SET completed = NOT completed WHERE id = ?1 RETURNING completed")
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        let Some(row) = row else { return Err(TodoError::NotFound(id.to_string())) };
        Ok(row.try_get("completed")?)
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.to_string())
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 {
            tracing::debug!(%id, "delete of missing todo");
        }
        Ok(())
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo<DocumentId>, TodoError> {
    let id_str: String = row.try_get("id")?;
    let body: String = row.try_get("body")?;
    let completed: bool = row.try_get("completed")?;

    let id = id_str
        .parse::<DocumentId>()
        .map_err(|e| TodoError::Storage(format!("stored id {id_str:?} is not a uuid: {e}")))?;

    Ok(Todo { id, body, completed })
}
