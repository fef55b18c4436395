//! Audit trail entries and the soft-deletable entity types admins can restore.

use chrono::{DateTime, Utc};

use crate::{model::audit::AuditEntryDto, server::util::parse::StoredEnum};

/// Entity types written to `audit_log.entity_type`.
pub mod entity_type {
    pub const COURSE: &str = "course";
    pub const COURSE_APPROVAL: &str = "course_approval";
    pub const INVITATION: &str = "invitation";
    pub const ORGANIZATION: &str = "organization";
    pub const POST: &str = "post";
    pub const COMMENT: &str = "comment";
    pub const JOB: &str = "job";
    pub const RESEARCH: &str = "research";
    pub const CLUB: &str = "club";
    pub const EVENT: &str = "event";
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: i32,
    pub actor_id: Option<i32>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn from_entity(entity: entity::audit_log::Model) -> Self {
        Self {
            id: entity.id,
            actor_id: entity.actor_id,
            action: entity.action,
            entity_type: entity.entity_type,
            entity_id: entity.entity_id,
            details: entity.details,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> AuditEntryDto {
        AuditEntryDto {
            id: self.id,
            actor_id: self.actor_id,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            details: self.details,
            created_at: self.created_at,
        }
    }
}

/// Parameters for one audit record.
#[derive(Debug, Clone)]
pub struct RecordAuditParam {
    pub actor_id: Option<i32>,
    /// Dotted verb such as `course.submitted`.
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: i32,
    pub details: Option<serde_json::Value>,
}

impl RecordAuditParam {
    pub fn new(actor_id: i32, action: &'static str, entity_type: &'static str, entity_id: i32) -> Self {
        Self {
            actor_id: Some(actor_id),
            action,
            entity_type,
            entity_id,
            details: None,
        }
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Soft-deleted entities a platform admin can bring back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorableEntity {
    Post,
    Course,
}

impl StoredEnum for RestorableEntity {
    const KIND: &'static str = "restorable entity";
    const ALL: &'static [Self] = &[Self::Post, Self::Course];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Post => entity_type::POST,
            Self::Course => entity_type::COURSE,
        }
    }
}
