use std::sync::Arc;
use std::time::Duration;

use crate::auth::application::use_cases::register_user::{
    IRegisterUserUseCase, RegisterError, RegisterRequest, RegisterUserOutput,
};
use crate::email::application::ports::outgoing::user_email_notifier::{
    UserEmailNotifier, VerificationEmail,
};

// ============================================================================
// Registration Output with Message
// ============================================================================
#[derive(Debug)]
pub struct UserRegistrationOutput {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub message: String,
}

impl From<RegisterUserOutput> for UserRegistrationOutput {
    fn from(output: RegisterUserOutput) -> Self {
        Self {
            user_id: output.user_id,
            username: output.username,
            email: output.email,
            message: "Account created. Please check your email to verify your account."
                .to_string(),
        }
    }
}

// ============================================================================
// Registration Errors
// ============================================================================
#[derive(Debug, thiserror::Error)]
pub enum UserRegistrationError {
    #[error("User creation failed: {0}")]
    RegisterFailed(#[from] RegisterError),
}

// ============================================================================
// User Registration Orchestrator
// ============================================================================
/// Creates the account, then sends the verification mail as a detached task
/// so a slow SMTP server never delays the HTTP response. Send failures are
/// retried with backoff; the user can always request a fresh link by trying
/// to log in later.
#[derive(Clone)]
pub struct UserRegistrationOrchestrator {
    register_use_case: Arc<dyn IRegisterUserUseCase>,
    email_notifier: Arc<dyn UserEmailNotifier>,
}

impl UserRegistrationOrchestrator {
    pub fn new(
        register_use_case: Arc<dyn IRegisterUserUseCase>,
        email_notifier: Arc<dyn UserEmailNotifier>,
    ) -> Self {
        Self {
            register_use_case,
            email_notifier,
        }
    }

    pub async fn register_user(
        &self,
        request: RegisterRequest,
    ) -> Result<UserRegistrationOutput, UserRegistrationError> {
        let created = self.register_use_case.execute(request).await?;

        let email_notifier = self.email_notifier.clone();
        let mail = VerificationEmail {
            to: created.email.clone(),
            username: created.username.clone(),
            token: created.verification_token.clone(),
        };
        let user_id = created.user_id;

        tokio::spawn(async move {
            let max_retries = 3;
            for attempt in 1..=max_retries {
                match email_notifier.send_verification_email(mail.clone()).await {
                    Ok(_) => return,
                    Err(e) if attempt < max_retries => {
                        tracing::warn!(
                            "Email attempt {}/{} failed for user {}: {}. Retrying...",
                            attempt,
                            max_retries,
                            user_id,
                            e
                        );
                        tokio::time::sleep(Duration::from_secs(2_u64.pow(attempt))).await;
                    }
                    Err(e) => {
                        tracing::error!(
                            "All {} email attempts failed for user {}: {}",
                            max_retries,
                            user_id,
                            e
                        );
                    }
                }
            }
        });

        Ok(created.into())
    }
}
