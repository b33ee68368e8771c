mod delete_account;
mod fetch_profile;
mod forgot_password;
mod login_user;
mod register_user;
mod reset_password;
mod update_profile;
mod verify_email;

pub use delete_account::delete_account_handler;
pub use fetch_profile::fetch_profile_handler;
pub use forgot_password::forgot_password_handler;
pub use login_user::{login_user_handler, logout_user_handler};
pub use register_user::register_user_handler;
pub use reset_password::reset_password_handler;
pub use update_profile::update_profile_handler;
pub use verify_email::verify_user_email_handler;
