pub mod extractors;
pub mod rate_limit;
pub mod routes;
