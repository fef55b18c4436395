//! Notification factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates an unread notification of `kind` for `user_id`.
pub async fn create_notification(
    db: &DatabaseConnection,
    user_id: i32,
    kind: &str,
) -> Result<entity::notification::Model, DbErr> {
    entity::notification::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        actor_id: ActiveValue::Set(None),
        kind: ActiveValue::Set(kind.to_string()),
        message: ActiveValue::Set(format!("Test {} notification", kind)),
        link: ActiveValue::Set(None),
        read_at: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
