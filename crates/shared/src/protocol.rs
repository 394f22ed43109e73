use serde::{Deserialize, Serialize};

use crate::domain::{TodoId, TodoStatus, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodoRequest {
    pub title: String,
    pub description: String,
    pub due_time: String,
    pub status: TodoStatus,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub due_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub firstname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub firstname: String,
    pub name: String,
    pub email: String,
    pub password: String,
}
