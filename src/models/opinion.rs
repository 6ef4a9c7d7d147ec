use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpinionSide {
    #[sea_orm(string_value = "FOR")]
    For,
    #[sea_orm(string_value = "AGAINST")]
    Against,
    #[sea_orm(string_value = "NEUTRAL")]
    Neutral,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// A user's declared side on a debate. Unique per (argu_id, user_id).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "argu_opinion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub argu_id: i32,
    pub user_id: i32,
    pub side: OpinionSide,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::argu::Entity",
        from = "Column::ArguId",
        to = "super::argu::Column::Id",
        on_delete = "Cascade"
    )]
    Argu,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::argu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Argu.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
