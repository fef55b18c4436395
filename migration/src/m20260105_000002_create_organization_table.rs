use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(pk_auto(Organization::Id))
                    .col(string(Organization::Name))
                    .col(string_uniq(Organization::Slug))
                    .col(text_null(Organization::Description))
                    .col(string_null(Organization::Website))
                    .col(integer(Organization::CreatedBy))
                    .col(timestamp_with_time_zone(Organization::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Organization::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Organization::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_created_by")
                            .from(Organization::Table, Organization::CreatedBy)
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
            .drop_table(Table::drop().table(Organization::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Organization {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Website,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
