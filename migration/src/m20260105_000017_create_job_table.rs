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
                    .table(Job::Table)
                    .if_not_exists()
                    .col(pk_auto(Job::Id))
                    .col(integer_null(Job::OrganizationId))
                    .col(integer(Job::PostedBy))
                    .col(string(Job::Title))
                    .col(text(Job::Description))
                    .col(string_null(Job::Location))
                    .col(string(Job::EmploymentType))
                    .col(string(Job::Status).default("open"))
                    .col(timestamp_with_time_zone_null(Job::ClosesAt))
                    .col(timestamp_with_time_zone(Job::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Job::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Job::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_organization_id")
                            .from(Job::Table, Job::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_posted_by")
                            .from(Job::Table, Job::PostedBy)
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
            .drop_table(Table::drop().table(Job::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Job {
    Table,
    Id,
    OrganizationId,
    PostedBy,
    Title,
    Description,
    Location,
    EmploymentType,
    Status,
    ClosesAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
