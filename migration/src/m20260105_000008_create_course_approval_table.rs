use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User, m20260105_000007_create_course_table::Course,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseApproval::Table)
                    .if_not_exists()
                    .col(pk_auto(CourseApproval::Id))
                    .col(integer(CourseApproval::CourseId))
                    .col(integer(CourseApproval::SubmittedBy))
                    .col(integer_null(CourseApproval::ReviewerId))
                    .col(string(CourseApproval::Status).default("pending"))
                    .col(text_null(CourseApproval::Feedback))
                    .col(timestamp_with_time_zone(CourseApproval::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(CourseApproval::ReviewedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_approval_course_id")
                            .from(CourseApproval::Table, CourseApproval::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_approval_submitted_by")
                            .from(CourseApproval::Table, CourseApproval::SubmittedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_approval_reviewer_id")
                            .from(CourseApproval::Table, CourseApproval::ReviewerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseApproval::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CourseApproval {
    Table,
    Id,
    CourseId,
    SubmittedBy,
    ReviewerId,
    Status,
    Feedback,
    CreatedAt,
    ReviewedAt,
}
