#[derive(Debug, Clone)]
pub struct VerificationEmail {
    pub to: String,
    pub username: String,
    /// Raw single-use token; the notifier embeds it into the link.
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct PasswordResetEmail {
    pub to: String,
    pub username: String,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UserEmailNotificationError {
    #[error("Email sending failed: {0}")]
    EmailSendingFailed(String),
}

#[async_trait::async_trait]
pub trait UserEmailNotifier: Send + Sync {
    async fn send_verification_email(
        &self,
        email: VerificationEmail,
    ) -> Result<(), UserEmailNotificationError>;

    async fn send_password_reset_email(
        &self,
        email: PasswordResetEmail,
    ) -> Result<(), UserEmailNotificationError>;
}
