//! `SeaORM` Entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "research_collaborator")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub research_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTimeUtc,
    pub responded_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::research::Entity",
        from = "Column::ResearchId",
        to = "super::research::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Research,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::research::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Research.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
