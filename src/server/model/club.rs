//! Clubs, club membership and events.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::club::{ClubDto, ClubMemberDto, EventDto},
    server::{
        model::user::User,
        util::parse::{parse_stored, StoredEnum},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClubRole {
    Leader,
    Member,
}

impl StoredEnum for ClubRole {
    const KIND: &'static str = "club role";
    const ALL: &'static [Self] = &[Self::Leader, Self::Member];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Member => "member",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Club {
    pub id: i32,
    pub organization_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

impl Club {
    pub fn from_entity(entity: entity::club::Model) -> Self {
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            name: entity.name,
            description: entity.description,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self, member_count: u64) -> ClubDto {
        ClubDto {
            id: self.id,
            organization_id: self.organization_id,
            name: self.name,
            description: self.description,
            created_by: self.created_by,
            member_count,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClubMember {
    pub user: User,
    pub role: ClubRole,
    pub joined_at: DateTime<Utc>,
}

impl ClubMember {
    pub fn from_entity(entity: entity::club_member::Model, user: User) -> Result<Self, DbErr> {
        Ok(Self {
            user,
            role: parse_stored(&entity.role)?,
            joined_at: entity.joined_at,
        })
    }

    pub fn into_dto(self) -> ClubMemberDto {
        ClubMemberDto {
            user: self.user.into_dto(),
            role: self.role.as_str().to_string(),
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateClubParam {
    pub organization_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i32,
    pub club_id: Option<i32>,
    pub organization_id: Option<i32>,
    pub created_by: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn from_entity(entity: entity::event::Model) -> Self {
        Self {
            id: entity.id,
            club_id: entity.club_id,
            organization_id: entity.organization_id,
            created_by: entity.created_by,
            title: entity.title,
            description: entity.description,
            location: entity.location,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            capacity: entity.capacity,
            created_at: entity.created_at,
        }
    }

    /// Whether `attendee_count` RSVPs already fill the event.
    pub fn is_full(&self, attendee_count: u64) -> bool {
        self.capacity
            .is_some_and(|capacity| attendee_count >= capacity.max(0) as u64)
    }
}

/// An event with its RSVP count and whether the viewer attends.
#[derive(Debug, Clone, PartialEq)]
pub struct EventView {
    pub event: Event,
    pub attendee_count: u64,
    pub attending: bool,
}

impl EventView {
    pub fn into_dto(self) -> EventDto {
        EventDto {
            id: self.event.id,
            club_id: self.event.club_id,
            organization_id: self.event.organization_id,
            created_by: self.event.created_by,
            title: self.event.title,
            description: self.event.description,
            location: self.event.location,
            starts_at: self.event.starts_at,
            ends_at: self.event.ends_at,
            capacity: self.event.capacity,
            attendee_count: self.attendee_count,
            attending: self.attending,
            created_at: self.event.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventParam {
    pub club_id: Option<i32>,
    pub organization_id: Option<i32>,
    pub created_by: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(capacity: Option<i32>) -> Event {
        let now = Utc::now();
        Event {
            id: 1,
            club_id: None,
            organization_id: None,
            created_by: 1,
            title: "Reading group".to_string(),
            description: None,
            location: None,
            starts_at: now,
            ends_at: now,
            capacity,
            created_at: now,
        }
    }

    #[test]
    fn unlimited_events_are_never_full() {
        assert!(!event(None).is_full(10_000));
    }

    #[test]
    fn full_at_capacity() {
        let event = event(Some(2));
        assert!(!event.is_full(1));
        assert!(event.is_full(2));
    }
}
