//! Invitation factory for creating test invitations.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test invitations.
///
/// ```rust,ignore
/// let expired = InvitationFactory::new(&db, org.id, owner.id)
///     .email("late@example.edu")
///     .expires_at(Utc::now() - Duration::hours(1))
///     .build()
///     .await?;
/// ```
pub struct InvitationFactory<'a> {
    db: &'a DatabaseConnection,
    organization_id: i32,
    invited_by: i32,
    email: String,
    role: String,
    token: String,
    status: String,
    expires_at: DateTime<Utc>,
}

impl<'a> InvitationFactory<'a> {
    /// Defaults: email `"invitee{id}@example.edu"`, role `member`, status `pending`,
    /// expires in 7 days.
    pub fn new(db: &'a DatabaseConnection, organization_id: i32, invited_by: i32) -> Self {
        let id = next_id();
        Self {
            db,
            organization_id,
            invited_by,
            email: format!("invitee{}@example.edu", id),
            role: "member".to_string(),
            token: format!("token{:0>43}", id),
            status: "pending".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub async fn build(self) -> Result<entity::invitation::Model, DbErr> {
        entity::invitation::ActiveModel {
            organization_id: ActiveValue::Set(self.organization_id),
            email: ActiveValue::Set(self.email),
            role: ActiveValue::Set(self.role),
            token: ActiveValue::Set(self.token),
            status: ActiveValue::Set(self.status),
            invited_by: ActiveValue::Set(self.invited_by),
            expires_at: ActiveValue::Set(self.expires_at),
            created_at: ActiveValue::Set(Utc::now()),
            responded_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending invitation for `email` with role `member`.
pub async fn create_invitation(
    db: &DatabaseConnection,
    organization_id: i32,
    invited_by: i32,
    email: &str,
) -> Result<entity::invitation::Model, DbErr> {
    InvitationFactory::new(db, organization_id, invited_by)
        .email(email)
        .build()
        .await
}
