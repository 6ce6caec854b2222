use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables (and `.env` if present).
/// Every value has a default; only malformed values are rejected.
#[derive(Debug, Clone)]
pub struct Config {
    /// API origin, without the `/api` prefix.
    pub api_url: String,
    pub session_dir: PathBuf,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    /// Reads the environment; `api_url` and `session_dir` from the command line win over it.
    pub fn from_env(api_url: Option<String>, session_dir: Option<PathBuf>) -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("JOBTRACK_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("JOBTRACK_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let api_url = api_url
            .or_else(|| std::env::var("JOBTRACK_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Config {
            api_url: normalize_api_url(&api_url)?,
            session_dir: resolve_session_dir(
                session_dir,
                std::env::var("JOBTRACK_SESSION_DIR").ok(),
                dirs::config_dir,
            )?,
            request_timeout: Duration::from_secs(timeout_secs),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        })
    }
}

/// Flag, then environment, then `<config_dir>/jobtrack`. The platform lookup only
/// runs when neither is set.
fn resolve_session_dir(
    flag: Option<PathBuf>,
    env: Option<String>,
    config_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = flag.or_else(|| env.map(PathBuf::from)) {
        return Ok(dir);
    }
    config_dir()
        .map(|dir| dir.join("jobtrack"))
        .context("Could not determine a config directory; set JOBTRACK_SESSION_DIR or --session-dir")
}

/// Trims trailing slashes and a trailing `/api` so route constants can be appended verbatim.
fn normalize_api_url(raw: &str) -> Result<String> {
    let url = raw.trim().trim_end_matches('/');
    let url = url.strip_suffix("/api").unwrap_or(url);
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("API URL '{raw}' must start with http:// or https://");
    }
    Ok(url.to_string())
}
