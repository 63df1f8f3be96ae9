use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    // Lowercased username; lookups and uniqueness go through this column
    #[sea_orm(unique)]
    pub username_normalized: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub is_admin: bool,
    // Bootstrap admin: cannot be demoted or deleted
    pub is_protected: bool,

    // Set when an admin replies to one of this user's messages
    pub has_unread_messages: bool,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
