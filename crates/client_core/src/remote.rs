//! Remote collaborator seams and their reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Todo, TodoId, UserId, UserProfile},
    error::{ErrorBody, RemoteRejection},
    protocol::{
        LoginRequest, NewTodoRequest, RegisterRequest, TokenResponse, UpdateEmailRequest,
        UpdateTodoRequest, UpdateUserRequest,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

/// Header the backend reads the session token from.
pub const TOKEN_HEADER: &str = "token";

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn current_user(&self, token: &str) -> Result<UserProfile, ClientError>;
    async fn update_email(
        &self,
        token: &str,
        user_id: &UserId,
        request: &UpdateEmailRequest,
    ) -> Result<(), ClientError>;
    async fn update_user(
        &self,
        token: &str,
        user_id: &UserId,
        request: &UpdateUserRequest,
    ) -> Result<(), ClientError>;
}

#[async_trait]
pub trait TodoApi: UserApi {
    async fn list_todos(&self, token: &str) -> Result<Vec<Todo>, ClientError>;
    async fn create_todo(&self, token: &str, request: &NewTodoRequest) -> Result<(), ClientError>;
    async fn update_todo(
        &self,
        token: &str,
        request: &UpdateTodoRequest,
    ) -> Result<(), ClientError>;
    async fn delete_todo(&self, token: &str, id: &TodoId) -> Result<(), ClientError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<String, ClientError>;
    async fn login(&self, request: &LoginRequest) -> Result<String, ClientError>;
    /// `Ok(false)` when the backend refuses the token.
    async fn check_token(&self, token: &str) -> Result<bool, ClientError>;
}

pub struct HttpApi {
    http: Client,
    server_url: String,
}

impl HttpApi {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(server_url.trim())
            .map_err(|err| ClientError::Validation(format!("invalid server url: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Validation(format!(
                "unsupported server url scheme '{}'",
                parsed.scheme()
            )));
        }
        Ok(Self {
            http,
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    fn authed(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(TOKEN_HEADER, token)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or(fallback);
    debug!(status = status.as_u16(), %message, "remote rejected request");
    Err(RemoteRejection::new(status.as_u16(), message).into())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|err| ClientError::Transport(format!("invalid response body: {err}")))
}

#[async_trait]
impl UserApi for HttpApi {
    async fn current_user(&self, token: &str) -> Result<UserProfile, ClientError> {
        let response = self
            .authed(self.http.get(self.url("/users")), token)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_email(
        &self,
        token: &str,
        user_id: &UserId,
        request: &UpdateEmailRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .authed(
                self.http.put(self.url(&format!("/users/email/{user_id}"))),
                token,
            )
            .json(request)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn update_user(
        &self,
        token: &str,
        user_id: &UserId,
        request: &UpdateUserRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .authed(self.http.put(self.url(&format!("/users/{user_id}"))), token)
            .json(request)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait]
impl TodoApi for HttpApi {
    async fn list_todos(&self, token: &str) -> Result<Vec<Todo>, ClientError> {
        let response = self
            .authed(self.http.get(self.url("/user/todos")), token)
            .send()
            .await?;
        decode(response).await
    }

    async fn create_todo(&self, token: &str, request: &NewTodoRequest) -> Result<(), ClientError> {
        let response = self
            .authed(self.http.post(self.url("/todos")), token)
            .json(request)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn update_todo(
        &self,
        token: &str,
        request: &UpdateTodoRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .authed(
                self.http.put(self.url(&format!("/todos/{}", request.id))),
                token,
            )
            .json(request)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn delete_todo(&self, token: &str, id: &TodoId) -> Result<(), ClientError> {
        let response = self
            .authed(self.http.delete(self.url(&format!("/todos/{id}"))), token)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn register(&self, request: &RegisterRequest) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/register"))
            .json(request)
            .send()
            .await?;
        let body: TokenResponse = decode(response).await?;
        Ok(body.token)
    }

    async fn login(&self, request: &LoginRequest) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(request)
            .send()
            .await?;
        let body: TokenResponse = decode(response).await?;
        Ok(body.token)
    }

    async fn check_token(&self, token: &str) -> Result<bool, ClientError> {
        let response = self
            .authed(self.http.get(self.url("/check_token")), token)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(false);
        }
        ensure_success(response).await.map(|_| true)
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
