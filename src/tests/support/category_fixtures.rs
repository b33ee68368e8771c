use chrono::Utc;
use uuid::Uuid;

use crate::categories::application::ports::outgoing::category_repository::CategoryRecord;

/// Builds a category whose slug is the lowercased name and whose level is
/// derived from the number of path segments.
pub fn sample_category(
    id: Uuid,
    name: &str,
    path: &str,
    parent_id: Option<Uuid>,
) -> CategoryRecord {
    let now = Utc::now();
    CategoryRecord {
        id,
        name: name.to_string(),
        slug: name.to_lowercase(),
        code: name
            .chars()
            .take(3)
            .collect::<String>()
            .to_uppercase(),
        description: None,
        parent_id,
        level: path.split('/').count() as i16,
        path: path.to_string(),
        display_order: 0,
        is_active: true,
        recipe_count: 0,
        created_at: now,
        updated_at: now,
    }
}
