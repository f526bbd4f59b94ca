use crate::error::ScoutError;
use async_trait::async_trait;
use std::env;
use tracing::info;

pub const SUBJECT: &str = "New apartment opening";

/// Delivers the combined availability report. Transport is an external
/// collaborator; the run only decides whether to invoke it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, report: &str) -> Result<(), ScoutError>;
}

/// Sender and recipient for the notification email, pulled from the
/// environment. The recipient defaults to the sender.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub from: String,
    pub to: String,
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, ScoutError> {
        let from =
            env::var("SCOUT_EMAIL_FROM").map_err(|_| ScoutError::Config("SCOUT_EMAIL_FROM"))?;
        let to = env::var("SCOUT_EMAIL_TO").unwrap_or_else(|_| from.clone());
        Ok(Self { from, to })
    }
}

/// Composes the notification email and writes it to stdout, where the
/// deployment's mail submission pipe picks it up.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self, ScoutError> {
        Ok(Self::new(EmailConfig::from_env()?))
    }

    fn compose(&self, report: &str) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}\r\n",
            self.config.from, self.config.to, SUBJECT, report
        )
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, report: &str) -> Result<(), ScoutError> {
        println!("{}", self.compose(report));
        info!("Notification for {} handed off", self.config.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            from: "scout@example.com".to_string(),
            to: "me@example.com".to_string(),
        }
    }

    #[test]
    fn message_carries_subject_headers_and_body() {
        let notifier = EmailNotifier::new(config());
        let message = notifier.compose("Wingra Center\nhttps://example.com\n2 bd 4/1");

        assert!(message.starts_with("From: scout@example.com\r\n"));
        assert!(message.contains("To: me@example.com\r\n"));
        assert!(message.contains("Subject: New apartment opening\r\n"));
        assert!(message.contains("2 bd 4/1"));
    }

    #[test]
    fn headers_end_before_the_body() {
        let notifier = EmailNotifier::new(config());
        let message = notifier.compose("body text");
        let (headers, body) = message.split_once("\r\n\r\n").expect("header separator");
        assert_eq!(headers.split("\r\n").count(), 3);
        assert!(body.starts_with("body text"));
    }
}
