use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{
    error::TodoError,
    id::SequentialId,
    repository::TodoStore,
    todo::Todo,
};

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    todos: Vec<Todo<SequentialId>>,
}

/// Process-local store for development. Keeps insertion order; ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct MemoryTodoStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, TodoError> {
        self.inner
            .lock()
            .map_err(|_| TodoError::Storage("in-memory store lock poisoned".into()))
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    type Id = SequentialId;

    async fn init(&self) -> Result<(), TodoError> { Ok(()) }

    async fn insert(&self, body: String) -> Result<Todo<SequentialId>, TodoError> {
        let mut inner = self.lock()?;
        inner.last_id += 1;
        let todo = Todo::new(SequentialId(inner.last_id), body);
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn list(&self) -> Result<Vec<Todo<SequentialId>>, TodoError> {
        Ok(self.lock()?.todos.clone())
    }

    async fn find(&self, id: &SequentialId) -> Result<Todo<SequentialId>, TodoError> {
        self.lock()?
            .todos
            .iter()
            .find(|t| t.id == *id)
            .cloned()
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    async fn toggle(&self, id: &SequentialId) -> Result<bool, TodoError> {
        let mut inner = self.lock()?;
        let Some(todo) = inner.todos.iter_mut().find(|t| t.id == *id) else {
            return Err(TodoError::NotFound(id.to_string()));
        };
        todo.completed = !todo.completed;
        Ok(todo.completed)
    }

    async fn delete(&self, id: &SequentialId) -> Result<(), TodoError> {
        self.lock()?.todos.retain(|t| t.id != *id);
        Ok(())
    }
}
