use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public summary of a user, embedded in lists and other payloads.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub headline: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: bool,
}

/// The logged in user, including private account fields.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CurrentUserDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Full profile as seen by a particular viewer.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ProfileDto {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    /// `none`, `pending` or `following`, from the viewer's point of view.
    pub relationship: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UpdateProfileDto {
    pub name: String,
    pub username: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: bool,
}
