//! Follow edges and the follow request state machine.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::follow::{FollowRequestDto, FollowResultDto},
    server::{
        model::user::User,
        util::parse::{parse_stored, StoredEnum},
    },
};

/// Lifecycle of a follow request to a private account.
///
/// ```text
/// PENDING ──accept──▶ ACCEPTED
///    │ ────reject──▶ REJECTED
///    └─────cancel──▶ CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl StoredEnum for FollowRequestStatus {
    const KIND: &'static str = "follow request status";
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FollowRequestStatus {
    /// Only pending requests move; every other state is terminal.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Pending, Self::Cancelled)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FollowRequest {
    pub id: i32,
    pub requester_id: i32,
    pub target_id: i32,
    pub status: FollowRequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl FollowRequest {
    pub fn from_entity(entity: entity::follow_request::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            requester_id: entity.requester_id,
            target_id: entity.target_id,
            status: parse_stored(&entity.status)?,
            created_at: entity.created_at,
            responded_at: entity.responded_at,
        })
    }

    /// Converts to a DTO embedding the other party of the request.
    pub fn into_dto(self, user: User) -> FollowRequestDto {
        FollowRequestDto {
            id: self.id,
            requester_id: self.requester_id,
            target_id: self.target_id,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
            responded_at: self.responded_at,
            user: user.into_dto(),
        }
    }
}

/// What happened when a user asked to follow someone.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowOutcome {
    /// Public target: the edge exists now.
    Followed,
    /// Private target: a pending request was created.
    Requested(FollowRequest),
}

impl FollowOutcome {
    pub fn into_dto(self) -> FollowResultDto {
        match self {
            Self::Followed => FollowResultDto {
                status: "following".to_string(),
                request_id: None,
            },
            Self::Requested(request) => FollowResultDto {
                status: "pending".to_string(),
                request_id: Some(request.id),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_any_terminal_state() {
        use FollowRequestStatus::*;
        for next in [Accepted, Rejected, Cancelled] {
            assert!(Pending.can_transition_to(next));
        }
    }

    #[test]
    fn terminal_states_never_move() {
        use FollowRequestStatus::*;
        for from in [Accepted, Rejected, Cancelled] {
            for next in FollowRequestStatus::ALL {
                assert!(!from.can_transition_to(*next));
            }
        }
        assert!(!Pending.can_transition_to(Pending));
    }
}
