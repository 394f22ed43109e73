//! In-process stand-in for the REST backend used by view-model tests.

use async_trait::async_trait;
use shared::{
    domain::{Todo, TodoId, UserId, UserProfile},
    error::RemoteRejection,
    protocol::{
        LoginRequest, NewTodoRequest, RegisterRequest, UpdateEmailRequest, UpdateTodoRequest,
        UpdateUserRequest,
    },
};
use tokio::sync::Mutex;

use crate::{
    error::ClientError,
    remote::{AuthApi, TodoApi, UserApi},
};

#[derive(Default)]
pub(crate) struct FakeState {
    pub todos: Vec<Todo>,
    pub next_id: u32,
    pub user: UserProfile,
    pub password: String,
    pub calls: Vec<String>,
    pub fail_list: bool,
    pub reject_current_user: Option<(u16, String)>,
    pub reject_create: Option<(u16, String)>,
    pub reject_update: Option<(u16, String)>,
    pub reject_delete: Option<(u16, String)>,
    pub reject_email: Option<(u16, String)>,
    pub reject_user_update: Option<(u16, String)>,
    pub reject_login: Option<(u16, String)>,
    pub issued_token: String,
    pub valid_token: Option<String>,
}

pub(crate) struct FakeRemote {
    pub state: Mutex<FakeState>,
}

pub(crate) fn todo(id: &str, title: &str) -> Todo {
    Todo {
        id: TodoId::from(id),
        title: title.to_string(),
        description: String::new(),
        created_at: "2024-01-01 00:00:00".to_string(),
        due_time: "2024-01-02T10:00".to_string(),
        status: Default::default(),
        user_id: Some(UserId::from("1")),
    }
}

impl FakeRemote {
    pub fn new(todos: Vec<Todo>) -> Self {
        let next_id = todos.len() as u32 + 1;
        Self {
            state: Mutex::new(FakeState {
                todos,
                next_id,
                user: UserProfile {
                    id: UserId::from("1"),
                    firstname: "Ada".into(),
                    name: "Lovelace".into(),
                    email: "ada@example.com".into(),
                },
                issued_token: "jwt-issued".into(),
                ..FakeState::default()
            }),
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }
}

fn reject(failure: &Option<(u16, String)>) -> Result<(), ClientError> {
    match failure {
        Some((status, message)) => Err(RemoteRejection::new(*status, message.clone()).into()),
        None => Ok(()),
    }
}

#[async_trait]
impl UserApi for FakeRemote {
    async fn current_user(&self, _token: &str) -> Result<UserProfile, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push("current_user".into());
        reject(&state.reject_current_user)?;
        Ok(state.user.clone())
    }

    async fn update_email(
        &self,
        _token: &str,
        user_id: &UserId,
        request: &UpdateEmailRequest,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("update_email:{user_id}"));
        reject(&state.reject_email)?;
        state.user.email = request.email.clone();
        Ok(())
    }

    async fn update_user(
        &self,
        _token: &str,
        user_id: &UserId,
        request: &UpdateUserRequest,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("update_user:{user_id}"));
        reject(&state.reject_user_update)?;
        state.user.firstname = request.firstname.clone();
        state.user.name = request.name.clone();
        state.user.email = request.email.clone();
        state.password = request.password.clone();
        Ok(())
    }
}

#[async_trait]
impl TodoApi for FakeRemote {
    async fn list_todos(&self, _token: &str) -> Result<Vec<Todo>, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push("list".into());
        if state.fail_list {
            return Err(RemoteRejection::new(500, "Internal Server Error").into());
        }
        Ok(state.todos.clone())
    }

    async fn create_todo(&self, _token: &str, request: &NewTodoRequest) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("create:{}", request.user_id));
        reject(&state.reject_create)?;
        let id = state.next_id;
        state.next_id += 1;
        state.todos.push(Todo {
            id: TodoId(id.to_string()),
            title: request.title.clone(),
            description: request.description.clone(),
            created_at: format!("2024-01-01 00:00:{id:02}"),
            due_time: request.due_time.clone(),
            status: request.status,
            user_id: Some(request.user_id.clone()),
        });
        Ok(())
    }

    async fn update_todo(
        &self,
        _token: &str,
        request: &UpdateTodoRequest,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("update:{}", request.id));
        reject(&state.reject_update)?;
        let Some(todo) = state.todos.iter_mut().find(|todo| todo.id == request.id) else {
            return Err(RemoteRejection::new(404, "Not found").into());
        };
        todo.title = request.title.clone();
        todo.description = request.description.clone();
        todo.status = request.status;
        todo.due_time = request.due_time.clone();
        Ok(())
    }

    async fn delete_todo(&self, _token: &str, id: &TodoId) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("delete:{id}"));
        reject(&state.reject_delete)?;
        let before = state.todos.len();
        state.todos.retain(|todo| &todo.id != id);
        if state.todos.len() == before {
            return Err(RemoteRejection::new(404, "Not found").into());
        }
        Ok(())
    }
}

#[async_trait]
impl AuthApi for FakeRemote {
    async fn register(&self, request: &RegisterRequest) -> Result<String, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("register:{}", request.email));
        if request.email == state.user.email {
            return Err(RemoteRejection::new(409, "Account already exists").into());
        }
        Ok(state.issued_token.clone())
    }

    async fn login(&self, request: &LoginRequest) -> Result<String, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("login:{}", request.email));
        reject(&state.reject_login)?;
        Ok(state.issued_token.clone())
    }

    async fn check_token(&self, token: &str) -> Result<bool, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push("check_token".into());
        Ok(state.valid_token.as_deref() == Some(token))
    }
}
