use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User,
    m20260105_000002_create_organization_table::Organization,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Research::Table)
                    .if_not_exists()
                    .col(pk_auto(Research::Id))
                    .col(integer(Research::OwnerId))
                    .col(integer_null(Research::OrganizationId))
                    .col(string(Research::Title))
                    .col(text(Research::Summary))
                    .col(string_null(Research::Field))
                    .col(string(Research::Status).default("recruiting"))
                    .col(timestamp_with_time_zone(Research::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Research::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Research::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_owner_id")
                            .from(Research::Table, Research::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_organization_id")
                            .from(Research::Table, Research::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Research::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Research {
    Table,
    Id,
    OwnerId,
    OrganizationId,
    Title,
    Summary,
    Field,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
