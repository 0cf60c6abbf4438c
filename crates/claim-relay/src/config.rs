use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::info;

pub struct Config {
    pub port: u16,
    pub email_user: String,
    pub email_password: String,
    /// SMTP relay used when no mail API is configured
    pub smtp_host: String,
    /// Outbound HTTP mail API; SMTP when unset
    pub mail_api_url: Option<String>,
    pub mail_timeout_secs: u64,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, String> {
        Ok(Self {
            port: try_load("PORT", "5000")?,
            email_user: try_load("EMAIL_USER", "")?,
            email_password: env::var("EMAIL_PASSWORD").unwrap_or_default(),
            smtp_host: try_load("SMTP_HOST", "smtp.gmail.com")?,
            mail_api_url: env::var("MAIL_API_URL").ok().filter(|u| !u.trim().is_empty()),
            mail_timeout_secs: try_load("MAIL_TIMEOUT_SECS", "10")?,
            log_dir: PathBuf::from(try_load::<String>("RELAY_LOG_DIR", "logs")?),
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse().map_err(|e| format!("Invalid {key} value: {e}"))
}
