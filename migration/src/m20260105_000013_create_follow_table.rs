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
                    .table(Follow::Table)
                    .if_not_exists()
                    .col(integer(Follow::FollowerId))
                    .col(integer(Follow::FollowingId))
                    .col(timestamp_with_time_zone(Follow::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(Index::create().col(Follow::FollowerId).col(Follow::FollowingId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_follower_id")
                            .from(Follow::Table, Follow::FollowerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_following_id")
                            .from(Follow::Table, Follow::FollowingId)
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
                    .name("idx_follow_following_id")
                    .table(Follow::Table)
                    .col(Follow::FollowingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_follow_following_id")
                    .table(Follow::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Follow::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Follow {
    Table,
    FollowerId,
    FollowingId,
    CreatedAt,
}
