use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use tracing::{error, info, warn};

use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::use_cases::login_user::{LoginError, LoginRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

fn session_cookie(token: &str, expires_in: i64) -> Cookie<'static> {
    Cookie::build("token", token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(expires_in))
        .finish()
}

#[post("/api/auth/login")]
pub async fn login_user_handler(
    http_req: HttpRequest,
    req: web::Json<LoginRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::AUTH_POLICY, &http_req).await
    {
        return blocked;
    }

    let request = req.into_inner();
    info!(email = %request.email(), "Login attempt");

    match data.login_user_use_case.execute(request).await {
        Ok(response) => {
            info!(user_id = %response.user.id, "User logged in");

            let cookie = session_cookie(&response.token, response.expires_in);
            let mut http_response = ApiResponse::success(response);
            if let Err(e) = http_response.add_cookie(&cookie) {
                warn!(error = %e, "Failed to attach session cookie");
            }
            http_response
        }

        Err(LoginError::InvalidCredentials) => {
            warn!("Login failed: invalid credentials");
            ApiResponse::unauthorized("INVALID_CREDENTIALS", "Invalid email or password")
        }

        Err(LoginError::EmailNotVerified) => {
            warn!("Login failed: email not verified");
            ApiResponse::unauthorized(
                "EMAIL_NOT_VERIFIED",
                "Please verify your email address before logging in",
            )
        }

        Err(LoginError::AccountDisabled) => {
            warn!("Login failed: account disabled");
            ApiResponse::forbidden("ACCOUNT_DISABLED", "Account is disabled")
        }

        Err(LoginError::AccountLocked { retry_after_secs }) => {
            warn!(retry_after_secs, "Login failed: account locked");
            let mut response = ApiResponse::locked(
                "ACCOUNT_LOCKED",
                "Too many failed attempts. Account is temporarily locked",
            );
            response.headers_mut().insert(
                header::RETRY_AFTER,
                header::HeaderValue::from(retry_after_secs.max(0) as u64),
            );
            response
        }

        Err(LoginError::PasswordVerificationFailed(ref e)) => {
            error!(error = %e, "Password verification failed");
            ApiResponse::internal_error()
        }

        Err(LoginError::TokenGenerationFailed(ref e)) => {
            error!(error = %e, "Token generation failed");
            ApiResponse::internal_error()
        }

        Err(LoginError::QueryError(ref e)) => {
            error!(error = %e, "Database query failed");
            ApiResponse::internal_error()
        }
    }
}

/// Clearing the cookie is all logout needs to do: access tokens are
/// short-lived and stateless.
#[post("/api/auth/logout")]
pub async fn logout_user_handler() -> impl Responder {
    let mut expired = Cookie::build("token", "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .finish();
    expired.make_removal();

    let mut response: HttpResponse =
        ApiResponse::success(serde_json::json!({ "message": "Logged out" }));
    if let Err(e) = response.add_cookie(&expired) {
        warn!(error = %e, "Failed to attach removal cookie");
    }
    response
}
