use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000010_create_post_table::Post,
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
                    .table(PostLike::Table)
                    .if_not_exists()
                    .col(integer(PostLike::PostId))
                    .col(integer(PostLike::UserId))
                    .col(timestamp_with_time_zone(PostLike::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(Index::create().col(PostLike::PostId).col(PostLike::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_post_id")
                            .from(PostLike::Table, PostLike::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_user_id")
                            .from(PostLike::Table, PostLike::UserId)
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
            .drop_table(Table::drop().table(PostLike::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PostLike {
    Table,
    PostId,
    UserId,
    CreatedAt,
}
