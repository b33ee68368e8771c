use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub cuisine: Option<String>,
    // Stored as text; parsed into the domain enums at the boundary
    pub difficulty: String,
    pub status: String,
    pub visibility: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub servings: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub ingredients: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub instructions: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub dietary: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub average_rating: f64,
    pub total_ratings: i32,
    pub views: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        use chrono::Utc;
        use sea_orm::ActiveValue::Set;

        if !insert {
            self.updated_at = Set(Utc::now().into());
        }

        Ok(self)
    }
}
