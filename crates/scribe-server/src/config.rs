//! Server configuration loaded from environment variables (and `.env`).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasherKind {
    Argon2,
    Sha256,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Env: `SCRIBE_HOST` / `SCRIBE_PORT`. Default `0.0.0.0:3000`.
    pub addr: SocketAddr,

    /// Env: `SCRIBE_DB_PATH`. Default `scribe.db`.
    pub db_path: PathBuf,

    /// Env: `SCRIBE_JWT_SECRET`. Required.
    pub jwt_secret: String,

    /// Env: `SCRIBE_PASSWORD_HASHER` (`argon2` | `sha256`). Default `argon2`.
    pub hasher: HasherKind,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("SCRIBE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("SCRIBE_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("SCRIBE_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("SCRIBE_HOST must be an IP address")?;

        let db_path = var("SCRIBE_DB_PATH")
            .unwrap_or_else(|| "scribe.db".into())
            .into();

        let jwt_secret = var("SCRIBE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("SCRIBE_JWT_SECRET is unset or still a placeholder");
        }

        let hasher = match var("SCRIBE_PASSWORD_HASHER").as_deref() {
            None | Some("argon2") => HasherKind::Argon2,
            Some("sha256") => HasherKind::Sha256,
            Some(other) => bail!("unknown SCRIBE_PASSWORD_HASHER '{}'", other),
        };

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
            hasher,
        })
    }
}
