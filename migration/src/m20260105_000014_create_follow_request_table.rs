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
                    .table(FollowRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(FollowRequest::Id))
                    .col(integer(FollowRequest::RequesterId))
                    .col(integer(FollowRequest::TargetId))
                    .col(string(FollowRequest::Status).default("pending"))
                    .col(timestamp_with_time_zone(FollowRequest::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(FollowRequest::RespondedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_request_requester_id")
                            .from(FollowRequest::Table, FollowRequest::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_request_target_id")
                            .from(FollowRequest::Table, FollowRequest::TargetId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookups by target and status for the incoming request list
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_target_status")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::TargetId)
                    .col(FollowRequest::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_follow_request_target_status")
                    .table(FollowRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(FollowRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FollowRequest {
    Table,
    Id,
    RequesterId,
    TargetId,
    Status,
    CreatedAt,
    RespondedAt,
}
