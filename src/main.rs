pub mod health;
pub mod modules;
pub mod shared;

pub use modules::auth;
pub use modules::categories;
pub use modules::email;
pub use modules::recipes;

#[cfg(test)]
pub mod tests;

use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::adapter::outgoing::rate_limiter_redis::RedisRateLimiter;
use crate::auth::adapter::outgoing::security::argon2_hasher::Argon2Hasher;
use crate::auth::adapter::outgoing::user_query_postgres::UserQueryPostgres;
use crate::auth::adapter::outgoing::user_repository_postgres::UserRepositoryPostgres;
use crate::auth::application::orchestrator::user_registration::UserRegistrationOrchestrator;
use crate::auth::application::ports::outgoing::rate_limiter::RateLimiter;
use crate::auth::application::ports::outgoing::token_provider::TokenProvider;
use crate::auth::application::services::principal_resolver::PrincipalResolver;
use crate::auth::application::use_cases::{
    delete_account::{DeleteAccountUseCase, IDeleteAccountUseCase},
    fetch_profile::{FetchProfileUseCase, IFetchProfileUseCase},
    forgot_password::{ForgotPasswordUseCase, IForgotPasswordUseCase},
    login_user::{ILoginUserUseCase, LoginUserUseCase},
    register_user::RegisterUserUseCase,
    reset_password::{IResetPasswordUseCase, ResetPasswordUseCase},
    update_profile::{IUpdateProfileUseCase, UpdateProfileUseCase},
    verify_user_email::{IVerifyUserEmailUseCase, VerifyUserEmailUseCase},
};

use crate::categories::adapter::outgoing::category_repository_postgres::CategoryRepositoryPostgres;
use crate::categories::application::use_cases::{
    create_category::{CreateCategoryUseCase, ICreateCategoryUseCase},
    delete_category::{DeleteCategoryUseCase, IDeleteCategoryUseCase},
    get_category_tree::{GetCategoryTreeUseCase, IGetCategoryTreeUseCase},
    recount_recipes::{IRecountRecipesUseCase, RecountRecipesUseCase},
    update_category::{IUpdateCategoryUseCase, UpdateCategoryUseCase},
};

use crate::recipes::adapter::outgoing::{RecipeQueryPostgres, RecipeRepositoryPostgres};
use crate::recipes::application::use_cases::{
    create_recipe::{CreateRecipeUseCase, ICreateRecipeUseCase},
    delete_recipe::{DeleteRecipeUseCase, IDeleteRecipeUseCase},
    get_recipe::{GetRecipeUseCase, IGetRecipeUseCase},
    list_recipes::{IListRecipesUseCase, ListRecipesUseCase},
    rate_recipe::{IRateRecipeUseCase, RateRecipeUseCase},
    toggle_bookmark::{IToggleBookmarkUseCase, ToggleBookmarkUseCase},
    toggle_like::{IToggleLikeUseCase, ToggleLikeUseCase},
    update_recipe::{IUpdateRecipeUseCase, UpdateRecipeUseCase},
};

use crate::email::adapter::outgoing::smtp_sender::SmtpEmailSender;
use crate::email::application::ports::outgoing::user_email_notifier::UserEmailNotifier;
use crate::email::application::services::UserEmailService;
use crate::shared::api::custom_json_config;

use actix_web::{web, App, HttpServer};
use deadpool_redis::{Config, Runtime};
use sea_orm::{ConnectOptions, Database};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub register_user_orchestrator: UserRegistrationOrchestrator,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase>,
    pub verify_user_email_use_case: Arc<dyn IVerifyUserEmailUseCase>,
    pub forgot_password_use_case: Arc<dyn IForgotPasswordUseCase>,
    pub reset_password_use_case: Arc<dyn IResetPasswordUseCase>,
    pub fetch_profile_use_case: Arc<dyn IFetchProfileUseCase>,
    pub update_profile_use_case: Arc<dyn IUpdateProfileUseCase>,
    pub delete_account_use_case: Arc<dyn IDeleteAccountUseCase>,
    pub list_recipes_use_case: Arc<dyn IListRecipesUseCase>,
    pub get_recipe_use_case: Arc<dyn IGetRecipeUseCase>,
    pub create_recipe_use_case: Arc<dyn ICreateRecipeUseCase>,
    pub update_recipe_use_case: Arc<dyn IUpdateRecipeUseCase>,
    pub delete_recipe_use_case: Arc<dyn IDeleteRecipeUseCase>,
    pub rate_recipe_use_case: Arc<dyn IRateRecipeUseCase>,
    pub toggle_like_use_case: Arc<dyn IToggleLikeUseCase>,
    pub toggle_bookmark_use_case: Arc<dyn IToggleBookmarkUseCase>,
    pub get_category_tree_use_case: Arc<dyn IGetCategoryTreeUseCase>,
    pub create_category_use_case: Arc<dyn ICreateCategoryUseCase>,
    pub update_category_use_case: Arc<dyn IUpdateCategoryUseCase>,
    pub delete_category_use_case: Arc<dyn IDeleteCategoryUseCase>,
    pub recount_recipes_use_case: Arc<dyn IRecountRecipesUseCase>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

#[actix_web::main]
async fn start() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    // Environment variable loading: .env.{RUST_ENV} first, then .env
    let rust_env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{}", rust_env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
    let host = env::var("HOST").expect("HOST is not set in .env file");
    let port = env::var("PORT").expect("PORT is not set in .env file");
    let redis_url = env::var("REDIS_URL").expect("REDIS_URL is not set in .env file");

    let server_url = format!("{host}:{port}");

    // SMTP setup
    let from_email = env::var("EMAIL_FROM").expect("EMAIL_FROM not set");
    let smtp_sender = if rust_env == "test" {
        // Local Mailpit
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port: u16 = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .expect("Invalid SMTP_PORT");

        SmtpEmailSender::new_local(&smtp_host, smtp_port, &from_email)
    } else {
        let smtp_server = env::var("SMTP_SERVER").expect("SMTP_SERVER not set");
        let smtp_user = env::var("SMTP_USERNAME").expect("SMTP_USERNAME not set");
        let smtp_pass = env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD not set");

        SmtpEmailSender::new(&smtp_server, &smtp_user, &smtp_pass, &from_email)
            .expect("Failed to build SMTP transport")
    };

    // Links in outgoing mail point at the public origin, not the bind address.
    let base_url = env::var("APP_BASE_URL").unwrap_or_else(|_| format!("http://{server_url}"));

    // Database connection
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to connect to database");
    let db_arc = Arc::new(conn);

    // Redis connection
    let redis_pool = Config::from_url(&redis_url)
        .create_pool(Some(Runtime::Tokio1))
        .expect("Failed to create Redis pool");
    let redis_arc = Arc::new(redis_pool);

    // Outgoing adapters
    let user_repo = UserRepositoryPostgres::new(Arc::clone(&db_arc));
    let user_query = UserQueryPostgres::new(Arc::clone(&db_arc));
    let recipe_repo = RecipeRepositoryPostgres::new(Arc::clone(&db_arc));
    let recipe_query = RecipeQueryPostgres::new(Arc::clone(&db_arc));
    let category_repo = CategoryRepositoryPostgres::new(Arc::clone(&db_arc));

    let hasher = Argon2Hasher::from_env();
    let jwt_service = JwtTokenService::new(JwtConfig::from_env());
    let rate_limiter: Arc<dyn RateLimiter> =
        Arc::new(RedisRateLimiter::new(Arc::clone(&redis_arc)));

    let email_notifier: Arc<dyn UserEmailNotifier> = Arc::new(UserEmailService::new(
        Arc::new(smtp_sender),
        base_url,
    ));

    // Auth use cases
    let register_user_use_case = RegisterUserUseCase::new(user_repo.clone(), hasher.clone());
    let register_user_orchestrator = UserRegistrationOrchestrator::new(
        Arc::new(register_user_use_case),
        Arc::clone(&email_notifier),
    );

    let login_user_use_case = LoginUserUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        hasher.clone(),
        Arc::new(jwt_service.clone()),
    );
    let verify_user_email_use_case =
        VerifyUserEmailUseCase::new(user_query.clone(), user_repo.clone());
    let forgot_password_use_case = ForgotPasswordUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        Arc::clone(&email_notifier),
    );
    let reset_password_use_case =
        ResetPasswordUseCase::new(user_query.clone(), user_repo.clone(), hasher);
    let fetch_profile_use_case = FetchProfileUseCase::new(user_query.clone());
    let update_profile_use_case = UpdateProfileUseCase::new(user_repo.clone());
    let delete_account_use_case = DeleteAccountUseCase::new(user_repo);

    // Recipe use cases
    let list_recipes_use_case = ListRecipesUseCase::new(recipe_query.clone());
    let get_recipe_use_case = GetRecipeUseCase::new(recipe_query.clone(), recipe_repo.clone());
    let create_recipe_use_case = CreateRecipeUseCase::new(
        recipe_repo.clone(),
        category_repo.clone(),
        recipe_query.clone(),
    );
    let update_recipe_use_case = UpdateRecipeUseCase::new(
        recipe_repo.clone(),
        category_repo.clone(),
        recipe_query,
    );
    let delete_recipe_use_case = DeleteRecipeUseCase::new(recipe_repo.clone(), category_repo.clone());
    let rate_recipe_use_case = RateRecipeUseCase::new(recipe_repo.clone());
    let toggle_like_use_case = ToggleLikeUseCase::new(recipe_repo.clone());
    let toggle_bookmark_use_case = ToggleBookmarkUseCase::new(recipe_repo);

    // Category use cases
    let get_category_tree_use_case = GetCategoryTreeUseCase::new(category_repo.clone());
    let create_category_use_case = CreateCategoryUseCase::new(category_repo.clone());
    let update_category_use_case = UpdateCategoryUseCase::new(category_repo.clone());
    let delete_category_use_case = DeleteCategoryUseCase::new(category_repo.clone());
    let recount_recipes_use_case = RecountRecipesUseCase::new(category_repo);

    let state = AppState {
        register_user_orchestrator,
        login_user_use_case: Arc::new(login_user_use_case),
        verify_user_email_use_case: Arc::new(verify_user_email_use_case),
        forgot_password_use_case: Arc::new(forgot_password_use_case),
        reset_password_use_case: Arc::new(reset_password_use_case),
        fetch_profile_use_case: Arc::new(fetch_profile_use_case),
        update_profile_use_case: Arc::new(update_profile_use_case),
        delete_account_use_case: Arc::new(delete_account_use_case),
        list_recipes_use_case: Arc::new(list_recipes_use_case),
        get_recipe_use_case: Arc::new(get_recipe_use_case),
        create_recipe_use_case: Arc::new(create_recipe_use_case),
        update_recipe_use_case: Arc::new(update_recipe_use_case),
        delete_recipe_use_case: Arc::new(delete_recipe_use_case),
        rate_recipe_use_case: Arc::new(rate_recipe_use_case),
        toggle_like_use_case: Arc::new(toggle_like_use_case),
        toggle_bookmark_use_case: Arc::new(toggle_bookmark_use_case),
        get_category_tree_use_case: Arc::new(get_category_tree_use_case),
        create_category_use_case: Arc::new(create_category_use_case),
        update_category_use_case: Arc::new(update_category_use_case),
        delete_category_use_case: Arc::new(delete_category_use_case),
        recount_recipes_use_case: Arc::new(recount_recipes_use_case),
        rate_limiter,
    };

    let token_provider_arc: Arc<dyn TokenProvider> = Arc::new(jwt_service);
    let resolver_arc = Arc::new(PrincipalResolver::new(Arc::new(user_query)));
    let db_for_server = Arc::clone(&db_arc);

    info!("Server running on: {}", server_url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&token_provider_arc)))
            .app_data(web::Data::new(Arc::clone(&resolver_arc)))
            .app_data(web::Data::new(Arc::clone(&db_for_server)))
            .app_data(web::Data::new(Arc::clone(&redis_arc)))
            .app_data(custom_json_config())
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await
}

fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Auth
    cfg.service(crate::auth::adapter::incoming::web::routes::register_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::verify_user_email_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::login_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::logout_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::forgot_password_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::reset_password_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::fetch_profile_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::update_profile_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::delete_account_handler);
    // Recipes
    cfg.service(crate::recipes::adapter::incoming::web::routes::list_recipes_handler);
    cfg.service(crate::recipes::adapter::incoming::web::routes::get_recipe_handler);
    cfg.service(crate::recipes::adapter::incoming::web::routes::create_recipe_handler);
    cfg.service(crate::recipes::adapter::incoming::web::routes::update_recipe_handler);
    cfg.service(crate::recipes::adapter::incoming::web::routes::delete_recipe_handler);
    cfg.service(crate::recipes::adapter::incoming::web::routes::rate_recipe_handler);
    cfg.service(crate::recipes::adapter::incoming::web::routes::toggle_like_handler);
    cfg.service(crate::recipes::adapter::incoming::web::routes::toggle_bookmark_handler);
    // Categories
    cfg.service(crate::categories::adapter::incoming::web::routes::get_category_tree_handler);
    cfg.service(crate::categories::adapter::incoming::web::routes::create_category_handler);
    cfg.service(crate::categories::adapter::incoming::web::routes::update_category_handler);
    cfg.service(crate::categories::adapter::incoming::web::routes::delete_category_handler);
    cfg.service(crate::categories::adapter::incoming::web::routes::recount_category_handler);
    cfg.service(crate::categories::adapter::incoming::web::routes::recount_all_categories_handler);
}

fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
