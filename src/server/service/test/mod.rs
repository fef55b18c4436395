use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    data::notification::NotificationRepository,
    error::AppError,
    model::{notification::NotificationKind, user::User, PageRequest},
};

mod audit;
mod club;
mod invitation;
mod job;
mod post;
mod user;

/// Kinds of the notifications `user_id` has received, newest first.
async fn notification_kinds(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<NotificationKind>, AppError> {
    let page = NotificationRepository::new(db)
        .list(user_id, false, PageRequest::default())
        .await?;

    Ok(page.items.into_iter().map(|n| n.kind).collect())
}
