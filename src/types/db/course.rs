use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    // Minor units (cents)
    pub price: i32,
    pub duration: String,
    pub level: String,
    pub image_url: String,
    pub instructor: String,
    pub category: String,

    // JSON array of strings
    #[sea_orm(column_type = "Text")]
    pub tags: String,

    pub featured: bool,

    // Number of live enrollments, maintained incrementally
    pub enrollments: i32,
    pub rating: i32,
    pub reviews: i32,

    // JSON document: { "sections": [ { "title", "lessons": [...] } ] }
    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
