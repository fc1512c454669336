use async_trait::async_trait;

use super::{error::TodoError, id::TodoId, todo::Todo};

/// Persistence seam for todos. Implementations own the authoritative collection.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    type Id: TodoId;

    /// Prepares the backing medium. Called once at startup.
    async fn init(&self) -> Result<(), TodoError>;
    async fn insert(&self, body: String) -> Result<Todo<Self::Id>, TodoError>;
    async fn list(&self) -> Result<Vec<Todo<Self::Id>>, TodoError>;
    async fn find(&self, id: &Self::Id) -> Result<Todo<Self::Id>, TodoError>;
    /// Negates `completed` in one atomic step and returns the new value.
    async fn toggle(&self, id: &Self::Id) -> Result<bool, TodoError>;
    /// Removes the todo. Missing ids are not an error.
    async fn delete(&self, id: &Self::Id) -> Result<(), TodoError>;
}
