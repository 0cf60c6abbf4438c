//! Outbound mail transports

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::RelayError;
use crate::template::ClaimMessage;

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &ClaimMessage) -> Result<(), RelayError>;
}

/// Pick the transport for `config`. Without service-account credentials
/// nothing could be delivered, so that is a startup error.
pub fn from_config(config: &Config) -> Result<Arc<dyn MailTransport>, RelayError> {
    if config.email_user.trim().is_empty() || config.email_password.is_empty() {
        return Err(RelayError::NotConfigured(
            "EMAIL_USER and EMAIL_PASSWORD must be set".to_string(),
        ));
    }

    let timeout = Duration::from_secs(config.mail_timeout_secs);
    match &config.mail_api_url {
        Some(url) => Ok(Arc::new(HttpMailTransport::new(
            url.clone(),
            config.email_user.clone(),
            config.email_password.clone(),
            timeout,
        )?)),
        None => Ok(Arc::new(SmtpMailTransport::new(
            &config.smtp_host,
            &config.email_user,
            &config.email_password,
            timeout,
        )?)),
    }
}

/// SMTP submission over TLS as the service account
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn new(
        host: &str,
        user: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let from: Mailbox = user
            .parse()
            .map_err(|e| RelayError::NotConfigured(format!("EMAIL_USER is not an address: {e}")))?;
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| RelayError::NotConfigured(format!("SMTP relay {host}: {e}")))?
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .timeout(Some(timeout))
            .build();
        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &ClaimMessage) -> Result<(), RelayError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| RelayError::Transport(format!("bad recipient: {e}")))?;
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Sends through an HTTP mail API, authenticating as the service account
pub struct HttpMailTransport {
    client: reqwest::Client,
    api_url: String,
    user: String,
    password: String,
}

impl HttpMailTransport {
    pub fn new(
        api_url: String,
        user: String,
        password: String,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_url,
            user,
            password,
        })
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, message: &ClaimMessage) -> Result<(), RelayError> {
        let request = MailApiRequest {
            from: &self.user,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Transport(format!("mail API answered {}", status)));
        }
        Ok(())
    }
}
