//! Profile editor view-model: email and password edits against the
//! current user record.

use std::sync::Arc;

use shared::{
    domain::{UserId, UserProfile},
    protocol::{UpdateEmailRequest, UpdateUserRequest},
};
use tracing::{debug, info, warn};

use crate::{error::ClientError, remote::UserApi, session::SessionContext};

pub struct ProfileViewModel {
    api: Arc<dyn UserApi>,
    session: SessionContext,
    profile: Option<UserProfile>,
    email: String,
    saved_email: String,
    password: String,
    editing_email: bool,
    editing_password: bool,
    error: Option<String>,
}

impl ProfileViewModel {
    pub fn new(api: Arc<dyn UserApi>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            profile: None,
            email: String::new(),
            saved_email: String::new(),
            password: String::new(),
            editing_email: false,
            editing_password: false,
            error: None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_editing_email(&self) -> bool {
        self.editing_email
    }

    pub fn is_editing_password(&self) -> bool {
        self.editing_password
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Loads the signed-in user. Signed out: no request, nothing loaded.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let Ok(token) = self.session.require_token() else {
            debug!("profile load skipped: signed out");
            return Ok(());
        };
        let user = self.api.current_user(&token).await?;
        self.email = user.email.clone();
        self.saved_email = user.email.clone();
        self.profile = Some(user);
        Ok(())
    }

    pub fn begin_edit_email(&mut self) {
        self.editing_email = true;
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub async fn save_email(&mut self) -> Result<(), ClientError> {
        self.editing_email = false;
        let Some((token, user_id)) = self.target()? else {
            return Ok(());
        };

        let request = UpdateEmailRequest {
            email: self.email.clone(),
        };
        match self.api.update_email(&token, &user_id, &request).await {
            Ok(()) => {
                info!(user_id = %user_id, "email updated");
                self.error = None;
                self.saved_email = self.email.clone();
                if let Some(profile) = self.profile.as_mut() {
                    profile.email = self.email.clone();
                }
                Ok(())
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "email update failed");
                self.email = self.saved_email.clone();
                self.error = Some(err.display_message());
                Err(err)
            }
        }
    }

    pub fn begin_edit_password(&mut self) {
        self.editing_password = true;
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub async fn save_password(&mut self) -> Result<(), ClientError> {
        self.editing_password = false;
        let Some((token, user_id)) = self.target()? else {
            return Ok(());
        };
        let Some(profile) = self.profile.as_ref() else {
            return Err(ClientError::Validation("profile not loaded".into()));
        };

        let request = UpdateUserRequest {
            firstname: profile.firstname.clone(),
            name: profile.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        };
        match self.api.update_user(&token, &user_id, &request).await {
            Ok(()) => {
                info!(user_id = %user_id, "password updated");
                self.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "password update failed");
                self.password.clear();
                self.error = Some(err.display_message());
                Err(err)
            }
        }
    }

    fn target(&self) -> Result<Option<(String, UserId)>, ClientError> {
        let Ok(token) = self.session.require_token() else {
            debug!("profile save skipped: signed out");
            return Ok(None);
        };
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| ClientError::Validation("profile not loaded".into()))?;
        Ok(Some((token, profile.id.clone())))
    }
}

#[cfg(test)]
#[path = "tests/profile_tests.rs"]
mod tests;
