use axum::{extract::{rejection::JsonRejection, Path, State}, http::StatusCode, routing::{get, patch}, Json, Router};

use crate::{
    application::todo_service::TodoService,
    domain::{id::{parse_id, TodoId}, repository::TodoStore, todo::{CreateTodo, Todo}},
    http::types::{ApiError, DeleteResponse, ToggleResponse, INVALID_ID_MESSAGE},
};

pub struct AppState<S: TodoStore> { pub service: TodoService<S> }

impl<S: TodoStore> Clone for AppState<S> {
    fn clone(&self) -> Self { Self { service: self.service.clone() } }
}

pub fn router<S: TodoStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/api/todos/:id", patch(toggle_todo::<S>).get(get_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoStore>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo<S::Id>>>, ApiError> {
    let todos = state.service.list().await.map_err(|e| ApiError::from_todo(e, "Failed to fetch todos"))?;
    Ok(Json(todos))
}

async fn create_todo<S: TodoStore>(State(state): State<AppState<S>>, payload: Result<Json<CreateTodo>, JsonRejection>) -> Result<Json<Todo<S::Id>>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let todo = state.service.create(payload).await.map_err(|e| ApiError::from_todo(e, "Failed to create todo"))?;
    Ok(Json(todo))
}

async fn get_todo<S: TodoStore>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo<S::Id>>, ApiError> {
    let id = path_id::<S::Id>(&id)?;
    let todo = state.service.get(&id).await.map_err(|e| ApiError::from_todo(e, "Failed to fetch todo"))?;
    Ok(Json(todo))
}

async fn toggle_todo<S: TodoStore>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<ToggleResponse>, ApiError> {
    let id = path_id::<S::Id>(&id)?;
    let completed = state.service.toggle(&id).await.map_err(|e| ApiError::from_todo(e, "Failed to update todo"))?;
    Ok(Json(ToggleResponse { success: true, completed }))
}

async fn delete_todo<S: TodoStore>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<DeleteResponse>, ApiError> {
    let id = path_id::<S::Id>(&id)?;
    state.service.delete(&id).await.map_err(|e| ApiError::from_todo(e, "Failed to delete todo"))?;
    Ok(Json(DeleteResponse { success: true }))
}

fn path_id<I: TodoId>(raw: &str) -> Result<I, ApiError> { parse_id(raw).map_err(|e| ApiError::from_todo(e, INVALID_ID_MESSAGE)) }
