use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000019_create_research_table::Research,
    m20260105_000001_create_user_table::User,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResearchCollaborator::Table)
                    .if_not_exists()
                    .col(integer(ResearchCollaborator::ResearchId))
                    .col(integer(ResearchCollaborator::UserId))
                    .col(string(ResearchCollaborator::Status).default("pending"))
                    .col(string_null(ResearchCollaborator::Message))
                    .col(timestamp_with_time_zone(ResearchCollaborator::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(ResearchCollaborator::RespondedAt))
                    .primary_key(Index::create().col(ResearchCollaborator::ResearchId).col(ResearchCollaborator::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_collaborator_research_id")
                            .from(ResearchCollaborator::Table, ResearchCollaborator::ResearchId)
                            .to(Research::Table, Research::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_collaborator_user_id")
                            .from(ResearchCollaborator::Table, ResearchCollaborator::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResearchCollaborator::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ResearchCollaborator {
    Table,
    ResearchId,
    UserId,
    Status,
    Message,
    CreatedAt,
    RespondedAt,
}
