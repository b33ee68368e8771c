pub mod password_hasher;
pub mod rate_limiter;
pub mod token_provider;
pub mod user_query;
pub mod user_repository;

pub use password_hasher::{HashError, PasswordHasher};
pub use rate_limiter::{RateLimitDecision, RateLimiter, RateLimiterError};
pub use token_provider::{IssuedToken, TokenClaims, TokenError, TokenProvider};
pub use user_query::{UserQuery, UserQueryError};
pub use user_repository::{
    CreateUserData, UpdateProfileData, UserRepository, UserRepositoryError, UserResult,
};
