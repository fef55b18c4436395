//! Posts, comments and likes.

use chrono::{DateTime, Utc};

use crate::{
    model::post::{CommentDto, PostDto},
    server::model::user::User,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn from_entity(entity: entity::post::Model) -> Self {
        Self {
            id: entity.id,
            author_id: entity.author_id,
            content: entity.content,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// A post decorated with its author and counters for one viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub post: Post,
    pub author: User,
    pub like_count: u64,
    pub comment_count: u64,
    pub liked_by_viewer: bool,
}

impl PostView {
    pub fn into_dto(self) -> PostDto {
        PostDto {
            id: self.post.id,
            author: self.author.into_dto(),
            content: self.post.content,
            like_count: self.like_count,
            comment_count: self.comment_count,
            liked_by_viewer: self.liked_by_viewer,
            created_at: self.post.created_at,
            updated_at: self.post.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_entity(entity: entity::comment::Model) -> Self {
        Self {
            id: entity.id,
            post_id: entity.post_id,
            author_id: entity.author_id,
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub comment: Comment,
    pub author: User,
}

impl CommentView {
    pub fn into_dto(self) -> CommentDto {
        CommentDto {
            id: self.comment.id,
            post_id: self.comment.post_id,
            author: self.author.into_dto(),
            content: self.comment.content,
            created_at: self.comment.created_at,
        }
    }
}
