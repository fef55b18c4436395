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
                    .table(Invitation::Table)
                    .if_not_exists()
                    .col(pk_auto(Invitation::Id))
                    .col(integer(Invitation::OrganizationId))
                    .col(string(Invitation::Email))
                    .col(string(Invitation::Role))
                    .col(string_uniq(Invitation::Token))
                    .col(string(Invitation::Status).default("pending"))
                    .col(integer(Invitation::InvitedBy))
                    .col(timestamp_with_time_zone(Invitation::ExpiresAt))
                    .col(timestamp_with_time_zone(Invitation::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Invitation::RespondedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invitation_organization_id")
                            .from(Invitation::Table, Invitation::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invitation_invited_by")
                            .from(Invitation::Table, Invitation::InvitedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Sweep of expired invitations filters on status and expiry
        manager
            .create_index(
                Index::create()
                    .name("idx_invitation_status_expires_at")
                    .table(Invitation::Table)
                    .col(Invitation::Status)
                    .col(Invitation::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_invitation_status_expires_at")
                    .table(Invitation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Invitation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Invitation {
    Table,
    Id,
    OrganizationId,
    Email,
    Role,
    Token,
    Status,
    InvitedBy,
    ExpiresAt,
    CreatedAt,
    RespondedAt,
}
