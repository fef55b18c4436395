//! Factories for posts, comments and likes.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test posts.
pub struct PostFactory<'a> {
    db: &'a DatabaseConnection,
    author_id: i32,
    content: String,
    deleted: bool,
}

impl<'a> PostFactory<'a> {
    /// Defaults: content `"Post {id}"`, not deleted.
    pub fn new(db: &'a DatabaseConnection, author_id: i32) -> Self {
        Self {
            db,
            author_id,
            content: format!("Post {}", next_id()),
            deleted: false,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    pub async fn build(self) -> Result<entity::post::Model, DbErr> {
        let now = Utc::now();
        entity::post::ActiveModel {
            author_id: ActiveValue::Set(self.author_id),
            content: ActiveValue::Set(self.content),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(self.deleted.then_some(now)),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a post with default content.
pub async fn create_post(
    db: &DatabaseConnection,
    author_id: i32,
) -> Result<entity::post::Model, DbErr> {
    PostFactory::new(db, author_id).build().await
}

/// Creates a comment on the post.
pub async fn create_comment(
    db: &DatabaseConnection,
    post_id: i32,
    author_id: i32,
) -> Result<entity::comment::Model, DbErr> {
    entity::comment::ActiveModel {
        post_id: ActiveValue::Set(post_id),
        author_id: ActiveValue::Set(author_id),
        content: ActiveValue::Set(format!("Comment {}", next_id())),
        created_at: ActiveValue::Set(Utc::now()),
        deleted_at: ActiveValue::Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Records a like on the post.
pub async fn create_like(
    db: &DatabaseConnection,
    post_id: i32,
    user_id: i32,
) -> Result<entity::post_like::Model, DbErr> {
    entity::post_like::ActiveModel {
        post_id: ActiveValue::Set(post_id),
        user_id: ActiveValue::Set(user_id),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
