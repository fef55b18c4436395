use sea_orm_migration::{prelude::*, schema::*};

use super::{m20260105_000001_create_user_table::User, m20260105_000017_create_job_table::Job};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobApplication::Table)
                    .if_not_exists()
                    .col(pk_auto(JobApplication::Id))
                    .col(integer(JobApplication::JobId))
                    .col(integer(JobApplication::ApplicantId))
                    .col(text_null(JobApplication::CoverLetter))
                    .col(string_null(JobApplication::ResumeUrl))
                    .col(string(JobApplication::Status).default("submitted"))
                    .col(timestamp_with_time_zone(JobApplication::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(JobApplication::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_application_job_id")
                            .from(JobApplication::Table, JobApplication::JobId)
                            .to(Job::Table, Job::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_application_applicant_id")
                            .from(JobApplication::Table, JobApplication::ApplicantId)
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
            .drop_table(Table::drop().table(JobApplication::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum JobApplication {
    Table,
    Id,
    JobId,
    ApplicantId,
    CoverLetter,
    ResumeUrl,
    Status,
    CreatedAt,
    UpdatedAt,
}
