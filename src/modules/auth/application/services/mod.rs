pub mod password_policy;
pub mod principal_resolver;
pub mod token_digest;

pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use principal_resolver::{Principal, PrincipalResolver, ResolveError};
