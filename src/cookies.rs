//! Cookie persistence for Scholar sessions.
//!
//! Scholar hands out session cookies (GSP, NID) that keep result pages
//! stable across requests; carrying them between runs noticeably lowers the
//! CAPTCHA rate. The jar is a JSON file of [`Cookie`] entries that the
//! fetcher renders into a `Cookie` request header.

use crate::error::{Result, ScholarError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default cookie file path: `~/.rustscholar_cookies.json`
fn default_cookie_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".rustscholar_cookies.json"))
        .ok_or_else(|| ScholarError::Config("Cannot determine home directory".to_string()))
}

/// One stored cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Domain the cookie belongs to, with or without a leading dot
    pub domain: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub expires: Option<f64>,
}

impl Cookie {
    /// Whether this cookie applies to the given request host.
    fn matches_host(&self, host: &str) -> bool {
        let domain = self.domain.trim_start_matches('.');
        host == domain || host.ends_with(&format!(".{}", domain))
    }
}

/// Loads and saves cookies from a JSON file.
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    /// Jar at the default path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_cookie_path()?,
        })
    }

    /// Jar at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all stored cookies. A missing or unreadable file yields an
    /// empty jar rather than an error.
    pub fn load(&self) -> Vec<Cookie> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Cookie file not found");
            return Vec::new();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Vec<Cookie>>(&content) {
                Ok(cookies) => {
                    info!(count = cookies.len(), path = ?self.path, "Loaded cookies");
                    cookies
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse cookie file");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to read cookie file");
                Vec::new()
            }
        }
    }

    /// Saves cookies, replacing the file contents.
    pub fn save(&self, cookies: &[Cookie]) -> Result<()> {
        let content = serde_json::to_string_pretty(cookies)?;
        std::fs::write(&self.path, content)?;
        info!(count = cookies.len(), path = ?self.path, "Saved cookies");
        Ok(())
    }

    /// Removes the cookie file if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!(path = ?self.path, "Cleared cookies");
        }
        Ok(())
    }

    /// Renders the cookies matching `host` as a `Cookie` header value.
    /// Empty if nothing matches.
    pub fn header_for(&self, host: &str) -> String {
        self.load()
            .iter()
            .filter(|c| c.matches_host(host))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
