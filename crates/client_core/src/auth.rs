//! Registration, login and sign-out against the token store.

use std::sync::Arc;

use shared::protocol::{LoginRequest, RegisterRequest};
use tracing::info;

use crate::{error::ClientError, remote::AuthApi, session::SessionContext};

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub firstname: String,
}

pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: SessionContext,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    pub async fn register(&self, registration: Registration) -> Result<(), ClientError> {
        if [
            &registration.email,
            &registration.password,
            &registration.name,
            &registration.firstname,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
        {
            return Err(ClientError::required_fields());
        }

        let token = self
            .api
            .register(&RegisterRequest {
                email: registration.email.trim().to_string(),
                password: registration.password,
                name: registration.name,
                firstname: registration.firstname,
            })
            .await?;
        self.session.sign_in(&token)?;
        info!(email = %registration.email.trim(), "account registered");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::required_fields());
        }
        let token = self
            .api
            .login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.session.sign_in(&token)?;
        info!(email = %email.trim(), "signed in");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.session.sign_out()?;
        info!("signed out");
        Ok(())
    }

    /// `false` without a request when no token is stored.
    pub async fn check_token(&self) -> Result<bool, ClientError> {
        match self.session.require_token() {
            Ok(token) => self.api.check_token(&token).await,
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
