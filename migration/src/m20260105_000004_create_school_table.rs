use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000002_create_organization_table::Organization;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(School::Table)
                    .if_not_exists()
                    .col(pk_auto(School::Id))
                    .col(integer(School::OrganizationId))
                    .col(string(School::Name))
                    .col(text_null(School::Description))
                    .col(timestamp_with_time_zone(School::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_school_organization_id")
                            .from(School::Table, School::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(School::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum School {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    CreatedAt,
}
