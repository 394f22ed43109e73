use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "todo.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub token_path: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
            token_path: default_token_path(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    token_path: Option<PathBuf>,
    log_filter: Option<String>,
}

fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("todo-manager").join("token"))
        .unwrap_or_else(|| PathBuf::from(".todo-token"))
}

/// Defaults, then the config file, then the environment. An explicitly
/// named config file must exist; the default one is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    config_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if required || err.kind() != std::io::ErrorKind::NotFound => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, lookup);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.token_path {
        settings.token_path = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TODO_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("TODO_TOKEN_PATH") {
        settings.token_path = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__TOKEN_PATH") {
        settings.token_path = PathBuf::from(v);
    }

    if let Some(v) = lookup("TODO_LOG") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
