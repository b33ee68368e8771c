use std::sync::Arc;

use crate::email::application::ports::outgoing::email_sender::EmailSender;
use crate::email::application::ports::outgoing::user_email_notifier::{
    PasswordResetEmail, UserEmailNotificationError, UserEmailNotifier, VerificationEmail,
};

/// Renders and sends the transactional mails around the account lifecycle.
#[derive(Clone)]
pub struct UserEmailService {
    sender: Arc<dyn EmailSender>,
    base_url: String,
}

impl UserEmailService {
    pub fn new(sender: Arc<dyn EmailSender>, base_url: String) -> Self {
        Self {
            sender,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn verification_link(&self, token: &str) -> String {
        format!("{}/api/auth/verify-email/{}", self.base_url, token)
    }

    fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password/{}", self.base_url, token)
    }
}

#[async_trait::async_trait]
impl UserEmailNotifier for UserEmailService {
    async fn send_verification_email(
        &self,
        email: VerificationEmail,
    ) -> Result<(), UserEmailNotificationError> {
        let link = self.verification_link(&email.token);
        let body = format!(
            "<h1>Welcome to Ladle, {username}!</h1>\
             <p>Confirm your email address to start sharing recipes:</p>\
             <p><a href=\"{link}\">Verify my email</a></p>\
             <p>This link expires in 24 hours. If you did not create an account, ignore this message.</p>",
            username = email.username,
            link = link,
        );

        self.sender
            .send_email(&email.to, "Verify your Ladle account", &body)
            .await
            .map_err(UserEmailNotificationError::EmailSendingFailed)
    }

    async fn send_password_reset_email(
        &self,
        email: PasswordResetEmail,
    ) -> Result<(), UserEmailNotificationError> {
        let link = self.reset_link(&email.token);
        let body = format!(
            "<h1>Password reset</h1>\
             <p>Hi {username}, we received a request to reset your password.</p>\
             <p><a href=\"{link}\">Choose a new password</a></p>\
             <p>This link expires in 1 hour. If you did not request a reset, you can safely ignore this message.</p>",
            username = email.username,
            link = link,
        );

        self.sender
            .send_email(&email.to, "Reset your Ladle password", &body)
            .await
            .map_err(UserEmailNotificationError::EmailSendingFailed)
    }
}
