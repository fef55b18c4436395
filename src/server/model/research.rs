//! Research projects and collaboration requests.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::research::{CollaboratorDto, ResearchDetailsDto, ResearchDto},
    server::{
        model::user::User,
        util::parse::{parse_stored, StoredEnum},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchStatus {
    /// Accepting collaboration requests.
    Recruiting,
    Active,
    Completed,
}

impl StoredEnum for ResearchStatus {
    const KIND: &'static str = "research status";
    const ALL: &'static [Self] = &[Self::Recruiting, Self::Active, Self::Completed];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Recruiting => "recruiting",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorStatus {
    Pending,
    Accepted,
    Rejected,
}

impl StoredEnum for CollaboratorStatus {
    const KIND: &'static str = "collaborator status";
    const ALL: &'static [Self] = &[Self::Pending, Self::Accepted, Self::Rejected];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Research {
    pub id: i32,
    pub owner_id: i32,
    pub organization_id: Option<i32>,
    pub title: String,
    pub summary: String,
    pub field: Option<String>,
    pub status: ResearchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Research {
    pub fn from_entity(entity: entity::research::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            owner_id: entity.owner_id,
            organization_id: entity.organization_id,
            title: entity.title,
            summary: entity.summary,
            field: entity.field,
            status: parse_stored(&entity.status)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    pub fn into_dto(self) -> ResearchDto {
        ResearchDto {
            id: self.id,
            owner_id: self.owner_id,
            organization_id: self.organization_id,
            title: self.title,
            summary: self.summary,
            field: self.field,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A project with its owner and accepted collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchDetails {
    pub research: Research,
    pub owner: User,
    pub collaborators: Vec<User>,
}

impl ResearchDetails {
    pub fn into_dto(self) -> ResearchDetailsDto {
        ResearchDetailsDto {
            research: self.research.into_dto(),
            owner: self.owner.into_dto(),
            collaborators: self.collaborators.into_iter().map(User::into_dto).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collaborator {
    pub research_id: i32,
    pub user: User,
    pub status: CollaboratorStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Collaborator {
    pub fn from_entity(
        entity: entity::research_collaborator::Model,
        user: User,
    ) -> Result<Self, DbErr> {
        Ok(Self {
            research_id: entity.research_id,
            user,
            status: parse_stored(&entity.status)?,
            message: entity.message,
            created_at: entity.created_at,
            responded_at: entity.responded_at,
        })
    }

    pub fn into_dto(self) -> CollaboratorDto {
        CollaboratorDto {
            research_id: self.research_id,
            user: self.user.into_dto(),
            status: self.status.as_str().to_string(),
            message: self.message,
            created_at: self.created_at,
            responded_at: self.responded_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResearchParam {
    pub organization_id: Option<i32>,
    pub title: String,
    pub summary: String,
    pub field: Option<String>,
    pub status: ResearchStatus,
}
