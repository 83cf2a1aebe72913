use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Outbound email over SMTP. Configuration is only checked when a message is sent.
#[derive(Clone)]
pub struct Mailer {
    config: SmtpConfig,
    app_name: String,
}

impl Mailer {
    pub fn new(config: SmtpConfig, app_name: String) -> Self {
        Self { config, app_name }
    }

    pub async fn send_verification_code(
        &self,
        to: &str,
        name: &str,
        code: &str,
        valid_minutes: i64,
    ) -> AppResult<()> {
        let subject = format!("{} - Kode verifikasi", self.app_name);
        let body = verification_email_body(&self.app_name, name, code, valid_minutes);
        self.send(to, &subject, body).await?;
        log::info!("Verification code email sent to {to}");
        Ok(())
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> AppResult<()> {
        if self.config.host.trim().is_empty() || self.config.from.trim().is_empty() {
            return Err(AppError::ConfigError(
                "SMTP_HOST and SMTP_FROM must be configured".to_string(),
            ));
        }

        let from = self
            .config
            .from
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid SMTP_FROM: {e}")))?;
        let to = to
            .parse()
            .map_err(|e| AppError::ValidationError(format!("Invalid recipient: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::MailError(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .map_err(|e| AppError::MailError(e.to_string()))?
            .port(self.config.port);
        if !self.config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }
        let transport = builder.build();

        transport.send(message).await.map_err(|e| {
            log::error!("Sending email \"{subject}\" failed: {e}");
            AppError::MailError(e.to_string())
        })?;
        Ok(())
    }
}

fn verification_email_body(app_name: &str, name: &str, code: &str, valid_minutes: i64) -> String {
    maud::html! {
        p { "Assalamu'alaikum " (name) "," }
        p { "Kode verifikasi akun " (app_name) " Anda:" }
        p style="font-size:28px;font-weight:bold;letter-spacing:6px" { (code) }
        p { "Kode berlaku selama " (valid_minutes) " menit. Abaikan email ini jika Anda tidak mendaftar." }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_escapes_name() {
        let body = verification_email_body("Masjid", "<script>", "123456", 15);
        assert!(body.contains("123456"));
        assert!(body.contains("15 menit"));
        assert!(!body.contains("<script>"));
    }

    #[actix_web::test]
    async fn test_missing_smtp_host_is_config_error() {
        let mailer = Mailer::new(SmtpConfig::default(), "Masjid".to_string());
        let result = mailer
            .send_verification_code("a@example.com", "A", "123456", 15)
            .await;
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
