use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User, m20260105_000005_create_faculty_table::Faculty,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FacultyMember::Table)
                    .if_not_exists()
                    .col(integer(FacultyMember::FacultyId))
                    .col(integer(FacultyMember::UserId))
                    .col(string_null(FacultyMember::Title))
                    .col(timestamp_with_time_zone(FacultyMember::JoinedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .col(FacultyMember::FacultyId)
                            .col(FacultyMember::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculty_member_faculty_id")
                            .from(FacultyMember::Table, FacultyMember::FacultyId)
                            .to(Faculty::Table, Faculty::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculty_member_user_id")
                            .from(FacultyMember::Table, FacultyMember::UserId)
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
            .drop_table(Table::drop().table(FacultyMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FacultyMember {
    Table,
    FacultyId,
    UserId,
    Title,
    JoinedAt,
}
