//! # Login Mail Delivery
//!
//! Sends the one-time login code over SMTP. The transport is built once at
//! startup from the `smtp` configuration block; a delivery failure is
//! reported to the caller as a request-level error.

use crate::config::SmtpConfig;
use anyhow::{anyhow, Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }
        Ok(Self {
            transport: builder.build(),
            from_email: config.from_email.clone(),
        })
    }

    /// Sends the one-time login code to `to_email`.
    pub async fn send_login_code(&self, to_email: &str, code: &str) -> Result<()> {
        let message = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .context("invalid sender address in smtp config")?,
            )
            .to(to_email
                .parse()
                .map_err(|e| anyhow!("invalid recipient address: {e}"))?)
            .subject("Your DopamineExp Login Code")
            .header(ContentType::TEXT_PLAIN)
            .body(format!("Your one-time login code is: {code}"))?;

        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        Ok(())
    }
}
