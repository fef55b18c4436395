use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000002_create_organization_table::Organization,
    m20260105_000004_create_school_table::School,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Faculty::Table)
                    .if_not_exists()
                    .col(pk_auto(Faculty::Id))
                    .col(integer(Faculty::SchoolId))
                    .col(integer(Faculty::OrganizationId))
                    .col(string(Faculty::Name))
                    .col(text_null(Faculty::Description))
                    .col(timestamp_with_time_zone(Faculty::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculty_school_id")
                            .from(Faculty::Table, Faculty::SchoolId)
                            .to(School::Table, School::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculty_organization_id")
                            .from(Faculty::Table, Faculty::OrganizationId)
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
            .drop_table(Table::drop().table(Faculty::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Faculty {
    Table,
    Id,
    SchoolId,
    OrganizationId,
    Name,
    Description,
    CreatedAt,
}
