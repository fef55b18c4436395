use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User,
    m20260105_000002_create_organization_table::Organization,
    m20260105_000021_create_club_table::Club,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(pk_auto(Event::Id))
                    .col(integer_null(Event::ClubId))
                    .col(integer_null(Event::OrganizationId))
                    .col(integer(Event::CreatedBy))
                    .col(string(Event::Title))
                    .col(text_null(Event::Description))
                    .col(string_null(Event::Location))
                    .col(timestamp_with_time_zone(Event::StartsAt))
                    .col(timestamp_with_time_zone(Event::EndsAt))
                    .col(integer_null(Event::Capacity))
                    .col(timestamp_with_time_zone(Event::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Event::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_club_id")
                            .from(Event::Table, Event::ClubId)
                            .to(Club::Table, Club::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_organization_id")
                            .from(Event::Table, Event::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_created_by")
                            .from(Event::Table, Event::CreatedBy)
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
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Event {
    Table,
    Id,
    ClubId,
    OrganizationId,
    CreatedBy,
    Title,
    Description,
    Location,
    StartsAt,
    EndsAt,
    Capacity,
    CreatedAt,
    DeletedAt,
}
