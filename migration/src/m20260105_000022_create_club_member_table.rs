use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000021_create_club_table::Club,
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
                    .table(ClubMember::Table)
                    .if_not_exists()
                    .col(integer(ClubMember::ClubId))
                    .col(integer(ClubMember::UserId))
                    .col(string(ClubMember::Role).default("member"))
                    .col(timestamp_with_time_zone(ClubMember::JoinedAt).default(Expr::current_timestamp()))
                    .primary_key(Index::create().col(ClubMember::ClubId).col(ClubMember::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_club_member_club_id")
                            .from(ClubMember::Table, ClubMember::ClubId)
                            .to(Club::Table, Club::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_club_member_user_id")
                            .from(ClubMember::Table, ClubMember::UserId)
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
            .drop_table(Table::drop().table(ClubMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ClubMember {
    Table,
    ClubId,
    UserId,
    Role,
    JoinedAt,
}
