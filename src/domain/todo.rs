use serde::{Deserialize, Serialize};

use super::id::TodoId;

pub const EMPTY_BODY_MESSAGE: &str = "Todo body cannot be empty";

/// A stored todo, generic over the identifier scheme of its store.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Todo<I: TodoId> {
    pub id: I,
    pub body: String,
    pub completed: bool,
}

impl<I: TodoId> Todo<I> {
    pub fn new(id: I, body: String) -> Self {
        Self { id, body, completed: false }
    }
}

/// Request payload for creating a todo. A missing `body` reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub body: String,
}

impl CreateTodo {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}
