use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PostDto {
    pub id: i32,
    pub author: UserDto,
    pub content: String,
    pub like_count: u64,
    pub comment_count: u64,
    pub liked_by_viewer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PostFormDto {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CommentDto {
    pub id: i32,
    pub post_id: i32,
    pub author: UserDto,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CommentFormDto {
    pub content: String,
}
