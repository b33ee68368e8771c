pub mod jwt;
pub mod rate_limiter_redis;
pub mod sea_orm_entity;
pub mod security;
pub mod user_query_postgres;
pub mod user_repository_postgres;

pub use rate_limiter_redis::RedisRateLimiter;
pub use user_query_postgres::UserQueryPostgres;
pub use user_repository_postgres::UserRepositoryPostgres;
