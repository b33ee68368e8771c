pub mod delete_account;
pub mod fetch_profile;
pub mod forgot_password;
pub mod login_user;
pub mod register_user;
pub mod reset_password;
pub mod update_profile;
pub mod verify_user_email;
