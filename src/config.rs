//! Environment-driven server configuration

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_RELAY_URL: &str = "https://back2u.vercel.app/api/send-claim-email";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub relay_url: String,
    pub relay_timeout: Duration,
    pub session_idle: Duration,
}

impl Config {
    /// Read configuration from the environment (after `.env`, if any).
    pub fn load() -> Result<Self, String> {
        Ok(Self {
            port: try_load("BACK2U_PORT", "8080")?,
            db_path: PathBuf::from(try_load::<String>("BACK2U_DB_PATH", "back2u.db")?),
            log_dir: PathBuf::from(try_load::<String>("BACK2U_LOG_DIR", "logs")?),
            relay_url: try_load("CLAIM_RELAY_URL", DEFAULT_RELAY_URL)?,
            relay_timeout: Duration::from_secs(try_load("CLAIM_RELAY_TIMEOUT_SECS", "10")?),
            session_idle: Duration::from_secs(try_load("CLAIM_SESSION_IDLE_SECS", "1800")?),
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .map_err(|e| format!("Invalid {key} value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_default() {
        let port: u16 = try_load("BACK2U_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_try_load_rejects_garbage() {
        env::set_var("BACK2U_TEST_BAD_TIMEOUT", "soon");
        let err = try_load::<u64>("BACK2U_TEST_BAD_TIMEOUT", "10").unwrap_err();
        assert!(err.contains("BACK2U_TEST_BAD_TIMEOUT"));
    }
}
