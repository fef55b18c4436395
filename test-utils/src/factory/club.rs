//! Factories for clubs, club members, events and attendees.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a club and makes `created_by` its leader.
pub async fn create_club(
    db: &DatabaseConnection,
    created_by: i32,
) -> Result<entity::club::Model, DbErr> {
    let club = entity::club::ActiveModel {
        organization_id: ActiveValue::Set(None),
        name: ActiveValue::Set(format!("Club {}", next_id())),
        description: ActiveValue::Set(None),
        created_by: ActiveValue::Set(created_by),
        created_at: ActiveValue::Set(Utc::now()),
        deleted_at: ActiveValue::Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    create_club_member(db, club.id, created_by, "leader").await?;

    Ok(club)
}

/// Adds a club membership with the given role (`leader` or `member`).
pub async fn create_club_member(
    db: &DatabaseConnection,
    club_id: i32,
    user_id: i32,
    role: &str,
) -> Result<entity::club_member::Model, DbErr> {
    entity::club_member::ActiveModel {
        club_id: ActiveValue::Set(club_id),
        user_id: ActiveValue::Set(user_id),
        role: ActiveValue::Set(role.to_string()),
        joined_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}

/// Factory for creating test events.
pub struct EventFactory<'a> {
    db: &'a DatabaseConnection,
    created_by: i32,
    club_id: Option<i32>,
    starts_at: DateTime<Utc>,
    capacity: Option<i32>,
}

impl<'a> EventFactory<'a> {
    /// Defaults: standalone event starting in one day, lasting two hours, no capacity.
    pub fn new(db: &'a DatabaseConnection, created_by: i32) -> Self {
        Self {
            db,
            created_by,
            club_id: None,
            starts_at: Utc::now() + Duration::days(1),
            capacity: None,
        }
    }

    pub fn club_id(mut self, club_id: i32) -> Self {
        self.club_id = Some(club_id);
        self
    }

    pub fn starts_at(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = starts_at;
        self
    }

    pub fn capacity(mut self, capacity: i32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub async fn build(self) -> Result<entity::event::Model, DbErr> {
        entity::event::ActiveModel {
            club_id: ActiveValue::Set(self.club_id),
            organization_id: ActiveValue::Set(None),
            created_by: ActiveValue::Set(self.created_by),
            title: ActiveValue::Set(format!("Event {}", next_id())),
            description: ActiveValue::Set(None),
            location: ActiveValue::Set(None),
            starts_at: ActiveValue::Set(self.starts_at),
            ends_at: ActiveValue::Set(self.starts_at + Duration::hours(2)),
            capacity: ActiveValue::Set(self.capacity),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Records an RSVP for the event.
pub async fn create_attendee(
    db: &DatabaseConnection,
    event_id: i32,
    user_id: i32,
) -> Result<entity::event_attendee::Model, DbErr> {
    entity::event_attendee::ActiveModel {
        event_id: ActiveValue::Set(event_id),
        user_id: ActiveValue::Set(user_id),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
