use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use anyhow::anyhow;
use tracing::{debug, info};

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub resume_path: PathBuf,
    pub resume_filename: String,
    pub status_history_cap: usize,
    pub cors_max_age_secs: u64,
    pub spotify: Option<SpotifyCredentials>,
}

#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            redis_url: try_load("REDIS_URL", "redis://redis:6379")?,
            resume_path: try_load("RESUME_PATH", "public/resume.pdf")?,
            resume_filename: try_load("RESUME_FILENAME", "resume.pdf")?,
            status_history_cap: try_load("STATUS_HISTORY_CAP", "1000")?,
            cors_max_age_secs: try_load("CORS_MAX_AGE_SECS", "3600")?,
            spotify: load_spotify(),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

/// Unset falls back to `default`, a value that does not parse is an error.
fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("Invalid {key} value {raw:?}: {e}"))
}

/// Docker secret first, then a plain environment variable of the same name.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            debug!("No {secret_name} secret file: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| var(secret_name))
}

fn load_spotify() -> Option<SpotifyCredentials> {
    Some(SpotifyCredentials {
        client_id: read_secret("SPOTIFY_CLIENT_ID")?,
        client_secret: read_secret("SPOTIFY_CLIENT_SECRET")?,
        refresh_token: read_secret("SPOTIFY_REFRESH_TOKEN")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_uses_default() {
        let cap: usize = try_load("PORTFOLIO_TEST_UNSET_CAP", "1000").unwrap();

        assert_eq!(cap, 1000);
    }

    #[test]
    fn test_unparseable_value_is_error() {
        // SAFETY: the key is unique to this test.
        unsafe { env::set_var("PORTFOLIO_TEST_BAD_PORT", "eleven") };

        let err = try_load::<u16>("PORTFOLIO_TEST_BAD_PORT", "1111").unwrap_err();

        assert!(err.to_string().contains("PORTFOLIO_TEST_BAD_PORT"));
    }

    #[test]
    fn test_set_value_wins() {
        // SAFETY: the key is unique to this test.
        unsafe { env::set_var("PORTFOLIO_TEST_MAX_AGE", "60") };

        let max_age: u64 = try_load("PORTFOLIO_TEST_MAX_AGE", "3600").unwrap();

        assert_eq!(max_age, 60);
    }
}
