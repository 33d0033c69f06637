//! Helpers shared by the binaries.
use anyhow::{Context, Result};
use dialoguer::Password;
use std::path::Path;

use crate::config::{self, Config};

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    config::load(path).with_context(|| match path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "failed to load default config".to_string(),
    })
}

/// Secret given on the command line, otherwise read from the terminal
/// without echo.
pub fn client_secret(flag: Option<String>) -> Result<String> {
    match flag {
        Some(secret) => Ok(secret),
        None => Password::new()
            .with_prompt("apaleo client secret")
            .interact()
            .context("failed to read client secret"),
    }
}
