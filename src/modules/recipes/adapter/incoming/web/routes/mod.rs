mod create_recipe;
mod delete_recipe;
mod get_recipe;
mod list_recipes;
mod rate_recipe;
mod toggle_bookmark;
mod toggle_like;
mod update_recipe;

pub use create_recipe::create_recipe_handler;
pub use delete_recipe::delete_recipe_handler;
pub use get_recipe::get_recipe_handler;
pub use list_recipes::list_recipes_handler;
pub use rate_recipe::rate_recipe_handler;
pub use toggle_bookmark::toggle_bookmark_handler;
pub use toggle_like::toggle_like_handler;
pub use update_recipe::update_recipe_handler;

use crate::auth::adapter::incoming::web::extractors::auth::AuthenticatedUser;
use crate::recipes::application::ports::outgoing::recipe_query::Viewer;

/// Maps the (possibly absent) authenticated caller onto the read-side
/// viewer context.
fn viewer_for(user: Option<&AuthenticatedUser>) -> Viewer {
    match user {
        None => Viewer::Anonymous,
        Some(u) if u.is_admin() => Viewer::Admin(u.user_id),
        Some(u) => Viewer::User(u.user_id),
    }
}
