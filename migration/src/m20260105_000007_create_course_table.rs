use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User,
    m20260105_000002_create_organization_table::Organization,
    m20260105_000005_create_faculty_table::Faculty,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(pk_auto(Course::Id))
                    .col(integer(Course::OrganizationId))
                    .col(integer_null(Course::FacultyId))
                    .col(integer(Course::CreatedBy))
                    .col(string(Course::Title))
                    .col(string(Course::Code))
                    .col(text_null(Course::Description))
                    .col(integer_null(Course::Credits))
                    .col(string(Course::Status).default("draft"))
                    .col(timestamp_with_time_zone(Course::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Course::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Course::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_organization_id")
                            .from(Course::Table, Course::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_faculty_id")
                            .from(Course::Table, Course::FacultyId)
                            .to(Faculty::Table, Faculty::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_created_by")
                            .from(Course::Table, Course::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_organization_id")
                    .table(Course::Table)
                    .col(Course::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_course_organization_id")
                    .table(Course::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Course {
    Table,
    Id,
    OrganizationId,
    FacultyId,
    CreatedBy,
    Title,
    Code,
    Description,
    Credits,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
