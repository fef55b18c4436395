//! User domain models and parameters.

use chrono::{DateTime, Utc};

use crate::{
    model::user::{CurrentUserDto, ProfileDto, UserDto},
    server::util::parse::StoredEnum,
};

/// A platform account created on first login through the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Private accounts approve followers and hide their posts from non-followers.
    pub is_private: bool,
    /// Platform admins can read the audit log and restore deleted content.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Converts an entity model to a user domain model at the repository boundary.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            username: entity.username,
            name: entity.name,
            headline: entity.headline,
            bio: entity.bio,
            avatar_url: entity.avatar_url,
            is_private: entity.is_private,
            is_admin: entity.is_admin,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            username: self.username,
            name: self.name,
            headline: self.headline,
            avatar_url: self.avatar_url,
            is_private: self.is_private,
        }
    }

    pub fn into_current_dto(self) -> CurrentUserDto {
        CurrentUserDto {
            id: self.id,
            email: self.email,
            username: self.username,
            name: self.name,
            headline: self.headline,
            bio: self.bio,
            avatar_url: self.avatar_url,
            is_private: self.is_private,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

/// How the viewer relates to another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    None,
    /// The viewer sent a follow request that is still pending.
    Pending,
    Following,
}

impl StoredEnum for Relationship {
    const KIND: &'static str = "relationship";
    const ALL: &'static [Self] = &[Self::None, Self::Pending, Self::Following];

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Following => "following",
        }
    }
}

/// A profile together with its counters, as seen by one viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user: User,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    pub relationship: Relationship,
}

impl Profile {
    pub fn into_dto(self) -> ProfileDto {
        ProfileDto {
            id: self.user.id,
            username: self.user.username,
            name: self.user.name,
            headline: self.user.headline,
            bio: self.user.bio,
            avatar_url: self.user.avatar_url,
            is_private: self.user.is_private,
            follower_count: self.follower_count,
            following_count: self.following_count,
            post_count: self.post_count,
            relationship: self.relationship.as_str().to_string(),
            created_at: self.user.created_at,
        }
    }
}

/// Parameters for creating or refreshing a user after login.
///
/// The optional `is_admin` field preserves existing admin status when None.
#[derive(Debug, Clone)]
pub struct UpsertUserParam {
    /// Stable subject identifier issued by the identity provider.
    pub auth_subject: String,
    pub email: String,
    pub name: String,
    pub is_admin: Option<bool>,
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct UpdateProfileParam {
    pub name: String,
    pub username: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: bool,
}

/// Derives a username candidate from the local part of an email address.
///
/// Keeps `[a-z0-9_]`, maps other characters to `_`, and pads or truncates to the
/// 3..=30 character range accepted by profile updates.
pub fn username_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default().to_lowercase();

    let mut username: String = local
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(24)
        .collect();

    while username.len() < 3 {
        username.push('_');
    }

    username
}

/// Usernames are 3 to 30 characters of lowercase letters, digits and underscores.
pub fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl From<crate::model::user::UpdateProfileDto> for UpdateProfileParam {
    fn from(dto: crate::model::user::UpdateProfileDto) -> Self {
        Self {
            name: dto.name,
            username: dto.username,
            headline: dto.headline,
            bio: dto.bio,
            avatar_url: dto.avatar_url,
            is_private: dto.is_private,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_username_from_email() {
        assert_eq!(username_from_email("Ada.Lovelace@uni.example"), "ada_lovelace");
        assert_eq!(username_from_email("al@uni.example"), "al_");
        assert!(is_valid_username(&username_from_email(
            "an.extremely.long.local.part.for.testing@uni.example"
        )));
    }

    #[test]
    fn validates_usernames() {
        assert!(is_valid_username("ada_99"));
        assert!(!is_valid_username("Ada"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
    }
}
