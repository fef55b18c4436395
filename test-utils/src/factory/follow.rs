//! Factories for follow edges and follow requests.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a follow edge `follower_id -> following_id`.
pub async fn create_follow(
    db: &DatabaseConnection,
    follower_id: i32,
    following_id: i32,
) -> Result<entity::follow::Model, DbErr> {
    entity::follow::ActiveModel {
        follower_id: ActiveValue::Set(follower_id),
        following_id: ActiveValue::Set(following_id),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}

/// Creates a follow request with the given status (`pending`, `accepted`, ...).
pub async fn create_follow_request(
    db: &DatabaseConnection,
    requester_id: i32,
    target_id: i32,
    status: &str,
) -> Result<entity::follow_request::Model, DbErr> {
    let now = Utc::now();
    entity::follow_request::ActiveModel {
        requester_id: ActiveValue::Set(requester_id),
        target_id: ActiveValue::Set(target_id),
        status: ActiveValue::Set(status.to_string()),
        created_at: ActiveValue::Set(now),
        responded_at: ActiveValue::Set((status != "pending").then_some(now)),
        ..Default::default()
    }
    .insert(db)
    .await
}
