use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::error::TodoError;
use crate::domain::repository::TodoStore;
use crate::domain::todo::{CreateTodo, Todo, EMPTY_BODY_MESSAGE};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Validates requests and runs store operations under a per-call deadline.
pub struct TodoService<S: TodoStore> {
    store: Arc<S>,
    deadline: Duration,
}

impl<S: TodoStore> Clone for TodoService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), deadline: self.deadline }
    }
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S) -> Self { Self::with_deadline(store, DEFAULT_DEADLINE) }

    pub fn with_deadline(store: S, deadline: Duration) -> Self {
        Self { store: Arc::new(store), deadline }
    }

    pub async fn list(&self) -> Result<Vec<Todo<S::Id>>, TodoError> {
        self.bounded(self.store.list()).await
    }

    /// Rejects an empty body without touching the store.
    pub async fn create(&self, input: CreateTodo) -> Result<Todo<S::Id>, TodoError> {
        if input.body.is_empty() {
            return Err(TodoError::Validation(EMPTY_BODY_MESSAGE.into()));
        }
        let todo = self.bounded(self.store.insert(input.body)).await?;
        tracing::info!(id = %todo.id, "todo created");
        Ok(todo)
    }

    pub async fn get(&self, id: &S::Id) -> Result<Todo<S::Id>, TodoError> {
        self.bounded(self.store.find(id)).await
    }

    pub async fn toggle(&self, id: &S::Id) -> Result<bool, TodoError> {
        let completed = self.bounded(self.store.toggle(id)).await?;
        tracing::debug!(%id, completed, "todo toggled");
        Ok(completed)
    }

    pub async fn delete(&self, id: &S::Id) -> Result<(), TodoError> {
        self.bounded(self.store.delete(id)).await?;
        tracing::info!(%id, "todo deleted");
        Ok(())
    }

    async fn bounded<T>(&self, op: impl Future<Output = Result<T, TodoError>>) -> Result<T, TodoError> {
        tokio::time::timeout(self.deadline, op)
            .await
            .map_err(|_| TodoError::Timeout(self.deadline))?
    }
}
