//! In-app notifications created as side effects of other operations.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::{
    model::notification::NotificationDto,
    server::util::parse::{parse_stored, StoredEnum},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    FollowRequest,
    NewFollower,
    FollowAccepted,
    InvitationAccepted,
    CourseReviewRequested,
    CourseReviewed,
    PostLiked,
    PostCommented,
    ApplicationReceived,
    ApplicationStatusChanged,
    CollaborationRequested,
    CollaborationResponded,
}

impl StoredEnum for NotificationKind {
    const KIND: &'static str = "notification kind";
    const ALL: &'static [Self] = &[
        Self::FollowRequest,
        Self::NewFollower,
        Self::FollowAccepted,
        Self::InvitationAccepted,
        Self::CourseReviewRequested,
        Self::CourseReviewed,
        Self::PostLiked,
        Self::PostCommented,
        Self::ApplicationReceived,
        Self::ApplicationStatusChanged,
        Self::CollaborationRequested,
        Self::CollaborationResponded,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::FollowRequest => "follow_request",
            Self::NewFollower => "new_follower",
            Self::FollowAccepted => "follow_accepted",
            Self::InvitationAccepted => "invitation_accepted",
            Self::CourseReviewRequested => "course_review_requested",
            Self::CourseReviewed => "course_reviewed",
            Self::PostLiked => "post_liked",
            Self::PostCommented => "post_commented",
            Self::ApplicationReceived => "application_received",
            Self::ApplicationStatusChanged => "application_status_changed",
            Self::CollaborationRequested => "collaboration_requested",
            Self::CollaborationResponded => "collaboration_responded",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub actor_id: Option<i32>,
    pub kind: NotificationKind,
    pub message: String,
    pub link: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_entity(entity: entity::notification::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            actor_id: entity.actor_id,
            kind: parse_stored(&entity.kind)?,
            message: entity.message,
            link: entity.link,
            read_at: entity.read_at,
            created_at: entity.created_at,
        })
    }

    pub fn into_dto(self) -> NotificationDto {
        NotificationDto {
            id: self.id,
            actor_id: self.actor_id,
            kind: self.kind.as_str().to_string(),
            message: self.message,
            link: self.link,
            read: self.read_at.is_some(),
            created_at: self.created_at,
        }
    }
}

/// Parameters for notifying a user.
#[derive(Debug, Clone)]
pub struct CreateNotificationParam {
    /// Recipient.
    pub user_id: i32,
    /// User whose action triggered the notification.
    pub actor_id: Option<i32>,
    pub kind: NotificationKind,
    pub message: String,
    /// Frontend path such as `/courses/4`.
    pub link: Option<String>,
}

impl CreateNotificationParam {
    pub fn new(user_id: i32, actor_id: i32, kind: NotificationKind, message: String) -> Self {
        Self {
            user_id,
            actor_id: Some(actor_id),
            kind,
            message,
            link: None,
        }
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
