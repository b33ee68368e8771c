use actix_web::{delete, web, HttpRequest, Responder};
use tracing::{error, info};

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::auth::adapter::incoming::web::rate_limit;
use crate::auth::application::use_cases::delete_account::DeleteAccountError;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[delete("/api/users/profile")]
pub async fn delete_account_handler(
    http_req: HttpRequest,
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Some(blocked) =
        rate_limit::enforce(&data.rate_limiter, &rate_limit::API_POLICY, &http_req).await
    {
        return blocked;
    }

    match data.delete_account_use_case.execute(user.user_id).await {
        Ok(()) => {
            info!(user_id = %user.user_id, "Account deleted");
            ApiResponse::no_content()
        }

        Err(DeleteAccountError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(DeleteAccountError::RepositoryError(ref e)) => {
            error!(error = %e, "Account deletion failed");
            ApiResponse::internal_error()
        }
    }
}
