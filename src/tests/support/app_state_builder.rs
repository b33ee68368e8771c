//! Builds an [`AppState`] for route tests. Every use case defaults to a stub
//! that panics when called, so each test wires in exactly the mocks its route
//! touches and nothing else.

use actix_web::web;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::orchestrator::user_registration::UserRegistrationOrchestrator;
use crate::auth::application::ports::outgoing::rate_limiter::{
    RateLimitDecision, RateLimiter, RateLimiterError,
};
use crate::auth::application::ports::outgoing::user_repository::UserResult;
use crate::auth::application::use_cases::delete_account::{DeleteAccountError, IDeleteAccountUseCase};
use crate::auth::application::use_cases::fetch_profile::{
    FetchProfileError, IFetchProfileUseCase, ProfileView,
};
use crate::auth::application::use_cases::forgot_password::{
    ForgotPasswordError, ForgotPasswordRequest, IForgotPasswordUseCase,
};
use crate::auth::application::use_cases::login_user::{
    ILoginUserUseCase, LoginError, LoginRequest, LoginUserResponse,
};
use crate::auth::application::use_cases::register_user::{
    IRegisterUserUseCase, RegisterError, RegisterRequest, RegisterUserOutput,
};
use crate::auth::application::use_cases::reset_password::{
    IResetPasswordUseCase, ResetPasswordError, ResetPasswordRequest,
};
use crate::auth::application::use_cases::update_profile::{
    IUpdateProfileUseCase, UpdateProfileError, UpdateProfileRequest,
};
use crate::auth::application::use_cases::verify_user_email::{
    IVerifyUserEmailUseCase, VerifyEmailError,
};
use crate::categories::application::ports::outgoing::category_repository::CategoryRecord;
use crate::categories::application::use_cases::create_category::{
    CreateCategoryError, CreateCategoryRequest, ICreateCategoryUseCase,
};
use crate::categories::application::use_cases::delete_category::{
    DeleteCategoryError, IDeleteCategoryUseCase,
};
use crate::categories::application::use_cases::get_category_tree::{
    CategoryTreeNode, GetCategoryTreeError, IGetCategoryTreeUseCase,
};
use crate::categories::application::use_cases::recount_recipes::{
    IRecountRecipesUseCase, RecountRecipesError, RecountResult,
};
use crate::categories::application::use_cases::update_category::{
    IUpdateCategoryUseCase, UpdateCategoryError, UpdateCategoryRequest,
};
use crate::email::application::ports::outgoing::user_email_notifier::{
    PasswordResetEmail, UserEmailNotificationError, UserEmailNotifier, VerificationEmail,
};
use crate::recipes::application::ports::outgoing::recipe_query::{RecipeView, Viewer};
use crate::recipes::application::use_cases::create_recipe::{
    CreateRecipeError, CreateRecipeRequest, ICreateRecipeUseCase,
};
use crate::recipes::application::use_cases::delete_recipe::{DeleteRecipeError, IDeleteRecipeUseCase};
use crate::recipes::application::use_cases::get_recipe::{GetRecipeError, IGetRecipeUseCase};
use crate::recipes::application::use_cases::list_recipes::{
    IListRecipesUseCase, ListRecipesError, ListRecipesOutput, ListRecipesRequest,
};
use crate::recipes::application::use_cases::rate_recipe::{
    IRateRecipeUseCase, RateRecipeError, RateRecipeRequest, RatingSummary,
};
use crate::recipes::application::use_cases::toggle_bookmark::{
    BookmarkSummary, IToggleBookmarkUseCase, ToggleBookmarkError,
};
use crate::recipes::application::use_cases::toggle_like::{
    IToggleLikeUseCase, LikeSummary, ToggleLikeError,
};
use crate::recipes::application::use_cases::update_recipe::{
    IUpdateRecipeUseCase, UpdateRecipeError, UpdateRecipeRequest,
};
use crate::AppState;

/// Placeholder wired into every slot the test does not override.
struct Unused;

#[async_trait]
impl IRegisterUserUseCase for Unused {
    async fn execute(&self, _request: RegisterRequest) -> Result<RegisterUserOutput, RegisterError> {
        unimplemented!("register_user not wired in this test")
    }
}

#[async_trait]
impl ILoginUserUseCase for Unused {
    async fn execute(&self, _request: LoginRequest) -> Result<LoginUserResponse, LoginError> {
        unimplemented!("login_user not wired in this test")
    }
}

#[async_trait]
impl IVerifyUserEmailUseCase for Unused {
    async fn execute(&self, _raw_token: &str) -> Result<UserResult, VerifyEmailError> {
        unimplemented!("verify_user_email not wired in this test")
    }
}

#[async_trait]
impl IForgotPasswordUseCase for Unused {
    async fn execute(&self, _request: ForgotPasswordRequest) -> Result<(), ForgotPasswordError> {
        unimplemented!("forgot_password not wired in this test")
    }
}

#[async_trait]
impl IResetPasswordUseCase for Unused {
    async fn execute(
        &self,
        _raw_token: &str,
        _request: ResetPasswordRequest,
    ) -> Result<(), ResetPasswordError> {
        unimplemented!("reset_password not wired in this test")
    }
}

#[async_trait]
impl IFetchProfileUseCase for Unused {
    async fn execute(&self, _user_id: Uuid) -> Result<ProfileView, FetchProfileError> {
        unimplemented!("fetch_profile not wired in this test")
    }
}

#[async_trait]
impl IUpdateProfileUseCase for Unused {
    async fn execute(
        &self,
        _user_id: Uuid,
        _request: UpdateProfileRequest,
    ) -> Result<UserResult, UpdateProfileError> {
        unimplemented!("update_profile not wired in this test")
    }
}

#[async_trait]
impl IDeleteAccountUseCase for Unused {
    async fn execute(&self, _user_id: Uuid) -> Result<(), DeleteAccountError> {
        unimplemented!("delete_account not wired in this test")
    }
}

#[async_trait]
impl IListRecipesUseCase for Unused {
    async fn execute(
        &self,
        _viewer: Viewer,
        _request: ListRecipesRequest,
    ) -> Result<ListRecipesOutput, ListRecipesError> {
        unimplemented!("list_recipes not wired in this test")
    }
}

#[async_trait]
impl IGetRecipeUseCase for Unused {
    async fn execute(
        &self,
        _viewer: Viewer,
        _recipe_id: Uuid,
    ) -> Result<RecipeView, GetRecipeError> {
        unimplemented!("get_recipe not wired in this test")
    }
}

#[async_trait]
impl ICreateRecipeUseCase for Unused {
    async fn execute(
        &self,
        _author_id: Uuid,
        _request: CreateRecipeRequest,
    ) -> Result<RecipeView, CreateRecipeError> {
        unimplemented!("create_recipe not wired in this test")
    }
}

#[async_trait]
impl IUpdateRecipeUseCase for Unused {
    async fn execute(
        &self,
        _actor: Viewer,
        _recipe_id: Uuid,
        _request: UpdateRecipeRequest,
    ) -> Result<RecipeView, UpdateRecipeError> {
        unimplemented!("update_recipe not wired in this test")
    }
}

#[async_trait]
impl IDeleteRecipeUseCase for Unused {
    async fn execute(&self, _actor: Viewer, _recipe_id: Uuid) -> Result<(), DeleteRecipeError> {
        unimplemented!("delete_recipe not wired in this test")
    }
}

#[async_trait]
impl IRateRecipeUseCase for Unused {
    async fn execute(
        &self,
        _user_id: Uuid,
        _recipe_id: Uuid,
        _request: RateRecipeRequest,
    ) -> Result<RatingSummary, RateRecipeError> {
        unimplemented!("rate_recipe not wired in this test")
    }
}

#[async_trait]
impl IToggleLikeUseCase for Unused {
    async fn execute(
        &self,
        _user_id: Uuid,
        _recipe_id: Uuid,
    ) -> Result<LikeSummary, ToggleLikeError> {
        unimplemented!("toggle_like not wired in this test")
    }
}

#[async_trait]
impl IToggleBookmarkUseCase for Unused {
    async fn execute(
        &self,
        _user_id: Uuid,
        _recipe_id: Uuid,
    ) -> Result<BookmarkSummary, ToggleBookmarkError> {
        unimplemented!("toggle_bookmark not wired in this test")
    }
}

#[async_trait]
impl IGetCategoryTreeUseCase for Unused {
    async fn execute(&self) -> Result<Vec<CategoryTreeNode>, GetCategoryTreeError> {
        unimplemented!("get_category_tree not wired in this test")
    }
}

#[async_trait]
impl ICreateCategoryUseCase for Unused {
    async fn execute(
        &self,
        _request: CreateCategoryRequest,
    ) -> Result<CategoryRecord, CreateCategoryError> {
        unimplemented!("create_category not wired in this test")
    }
}

#[async_trait]
impl IUpdateCategoryUseCase for Unused {
    async fn execute(
        &self,
        _category_id: Uuid,
        _request: UpdateCategoryRequest,
    ) -> Result<CategoryRecord, UpdateCategoryError> {
        unimplemented!("update_category not wired in this test")
    }
}

#[async_trait]
impl IDeleteCategoryUseCase for Unused {
    async fn execute(&self, _category_id: Uuid) -> Result<(), DeleteCategoryError> {
        unimplemented!("delete_category not wired in this test")
    }
}

#[async_trait]
impl IRecountRecipesUseCase for Unused {
    async fn recount_one(&self, _category_id: Uuid) -> Result<RecountResult, RecountRecipesError> {
        unimplemented!("recount_recipes not wired in this test")
    }

    async fn recount_all(&self) -> Result<Vec<RecountResult>, RecountRecipesError> {
        unimplemented!("recount_recipes not wired in this test")
    }
}

/// Rate limiter that lets everything through.
struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    async fn hit(
        &self,
        _bucket: &str,
        _key: &str,
        _limit: u32,
        _window_secs: u64,
    ) -> Result<RateLimitDecision, RateLimiterError> {
        Ok(RateLimitDecision::Allowed)
    }
}

/// Notifier that swallows every mail.
struct NoopEmailNotifier;

#[async_trait]
impl UserEmailNotifier for NoopEmailNotifier {
    async fn send_verification_email(
        &self,
        _email: VerificationEmail,
    ) -> Result<(), UserEmailNotificationError> {
        Ok(())
    }

    async fn send_password_reset_email(
        &self,
        _email: PasswordResetEmail,
    ) -> Result<(), UserEmailNotificationError> {
        Ok(())
    }
}

pub struct TestAppStateBuilder {
    register_user: Arc<dyn IRegisterUserUseCase>,
    login_user: Arc<dyn ILoginUserUseCase>,
    verify_user_email: Arc<dyn IVerifyUserEmailUseCase>,
    forgot_password: Arc<dyn IForgotPasswordUseCase>,
    reset_password: Arc<dyn IResetPasswordUseCase>,
    fetch_profile: Arc<dyn IFetchProfileUseCase>,
    update_profile: Arc<dyn IUpdateProfileUseCase>,
    delete_account: Arc<dyn IDeleteAccountUseCase>,
    list_recipes: Arc<dyn IListRecipesUseCase>,
    get_recipe: Arc<dyn IGetRecipeUseCase>,
    create_recipe: Arc<dyn ICreateRecipeUseCase>,
    update_recipe: Arc<dyn IUpdateRecipeUseCase>,
    delete_recipe: Arc<dyn IDeleteRecipeUseCase>,
    rate_recipe: Arc<dyn IRateRecipeUseCase>,
    toggle_like: Arc<dyn IToggleLikeUseCase>,
    toggle_bookmark: Arc<dyn IToggleBookmarkUseCase>,
    get_category_tree: Arc<dyn IGetCategoryTreeUseCase>,
    create_category: Arc<dyn ICreateCategoryUseCase>,
    update_category: Arc<dyn IUpdateCategoryUseCase>,
    delete_category: Arc<dyn IDeleteCategoryUseCase>,
    recount_recipes: Arc<dyn IRecountRecipesUseCase>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            register_user: Arc::new(Unused),
            login_user: Arc::new(Unused),
            verify_user_email: Arc::new(Unused),
            forgot_password: Arc::new(Unused),
            reset_password: Arc::new(Unused),
            fetch_profile: Arc::new(Unused),
            update_profile: Arc::new(Unused),
            delete_account: Arc::new(Unused),
            list_recipes: Arc::new(Unused),
            get_recipe: Arc::new(Unused),
            create_recipe: Arc::new(Unused),
            update_recipe: Arc::new(Unused),
            delete_recipe: Arc::new(Unused),
            rate_recipe: Arc::new(Unused),
            toggle_like: Arc::new(Unused),
            toggle_bookmark: Arc::new(Unused),
            get_category_tree: Arc::new(Unused),
            create_category: Arc::new(Unused),
            update_category: Arc::new(Unused),
            delete_category: Arc::new(Unused),
            recount_recipes: Arc::new(Unused),
            rate_limiter: Arc::new(NoopRateLimiter),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_register_user(mut self, mock: impl IRegisterUserUseCase + 'static) -> Self {
        self.register_user = Arc::new(mock);
        self
    }

    pub fn with_login_user(mut self, mock: impl ILoginUserUseCase + 'static) -> Self {
        self.login_user = Arc::new(mock);
        self
    }

    pub fn with_verify_user_email(mut self, mock: impl IVerifyUserEmailUseCase + 'static) -> Self {
        self.verify_user_email = Arc::new(mock);
        self
    }

    pub fn with_forgot_password(mut self, mock: impl IForgotPasswordUseCase + 'static) -> Self {
        self.forgot_password = Arc::new(mock);
        self
    }

    pub fn with_reset_password(mut self, mock: impl IResetPasswordUseCase + 'static) -> Self {
        self.reset_password = Arc::new(mock);
        self
    }

    pub fn with_fetch_profile(mut self, mock: impl IFetchProfileUseCase + 'static) -> Self {
        self.fetch_profile = Arc::new(mock);
        self
    }

    pub fn with_update_profile(mut self, mock: impl IUpdateProfileUseCase + 'static) -> Self {
        self.update_profile = Arc::new(mock);
        self
    }

    pub fn with_delete_account(mut self, mock: impl IDeleteAccountUseCase + 'static) -> Self {
        self.delete_account = Arc::new(mock);
        self
    }

    pub fn with_list_recipes(mut self, mock: impl IListRecipesUseCase + 'static) -> Self {
        self.list_recipes = Arc::new(mock);
        self
    }

    pub fn with_get_recipe(mut self, mock: impl IGetRecipeUseCase + 'static) -> Self {
        self.get_recipe = Arc::new(mock);
        self
    }

    pub fn with_create_recipe(mut self, mock: impl ICreateRecipeUseCase + 'static) -> Self {
        self.create_recipe = Arc::new(mock);
        self
    }

    pub fn with_update_recipe(mut self, mock: impl IUpdateRecipeUseCase + 'static) -> Self {
        self.update_recipe = Arc::new(mock);
        self
    }

    pub fn with_delete_recipe(mut self, mock: impl IDeleteRecipeUseCase + 'static) -> Self {
        self.delete_recipe = Arc::new(mock);
        self
    }

    pub fn with_rate_recipe(mut self, mock: impl IRateRecipeUseCase + 'static) -> Self {
        self.rate_recipe = Arc::new(mock);
        self
    }

    pub fn with_toggle_like(mut self, mock: impl IToggleLikeUseCase + 'static) -> Self {
        self.toggle_like = Arc::new(mock);
        self
    }

    pub fn with_toggle_bookmark(mut self, mock: impl IToggleBookmarkUseCase + 'static) -> Self {
        self.toggle_bookmark = Arc::new(mock);
        self
    }

    pub fn with_get_category_tree(mut self, mock: impl IGetCategoryTreeUseCase + 'static) -> Self {
        self.get_category_tree = Arc::new(mock);
        self
    }

    pub fn with_create_category(mut self, mock: impl ICreateCategoryUseCase + 'static) -> Self {
        self.create_category = Arc::new(mock);
        self
    }

    pub fn with_update_category(mut self, mock: impl IUpdateCategoryUseCase + 'static) -> Self {
        self.update_category = Arc::new(mock);
        self
    }

    pub fn with_delete_category(mut self, mock: impl IDeleteCategoryUseCase + 'static) -> Self {
        self.delete_category = Arc::new(mock);
        self
    }

    pub fn with_recount_recipes(mut self, mock: impl IRecountRecipesUseCase + 'static) -> Self {
        self.recount_recipes = Arc::new(mock);
        self
    }

    pub fn with_rate_limiter(mut self, mock: impl RateLimiter + 'static) -> Self {
        self.rate_limiter = Arc::new(mock);
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            register_user_orchestrator: UserRegistrationOrchestrator::new(
                self.register_user,
                Arc::new(NoopEmailNotifier),
            ),
            login_user_use_case: self.login_user,
            verify_user_email_use_case: self.verify_user_email,
            forgot_password_use_case: self.forgot_password,
            reset_password_use_case: self.reset_password,
            fetch_profile_use_case: self.fetch_profile,
            update_profile_use_case: self.update_profile,
            delete_account_use_case: self.delete_account,
            list_recipes_use_case: self.list_recipes,
            get_recipe_use_case: self.get_recipe,
            create_recipe_use_case: self.create_recipe,
            update_recipe_use_case: self.update_recipe,
            delete_recipe_use_case: self.delete_recipe,
            rate_recipe_use_case: self.rate_recipe,
            toggle_like_use_case: self.toggle_like,
            toggle_bookmark_use_case: self.toggle_bookmark,
            get_category_tree_use_case: self.get_category_tree,
            create_category_use_case: self.create_category,
            update_category_use_case: self.update_category,
            delete_category_use_case: self.delete_category,
            recount_recipes_use_case: self.recount_recipes,
            rate_limiter: self.rate_limiter,
        })
    }
}
