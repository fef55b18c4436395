use sea_orm::DatabaseConnection;

use crate::server::{
    data::notification::NotificationRepository,
    error::AppError,
    model::{notification::Notification, user::User, PageRequest, Paginated},
};

pub struct NotificationService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The actor's notifications, newest first.
    pub async fn list(
        &self,
        actor: &User,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Paginated<Notification>, AppError> {
        Ok(NotificationRepository::new(self.db)
            .list(actor.id, unread_only, page)
            .await?)
    }

    pub async fn unread_count(&self, actor: &User) -> Result<u64, AppError> {
        Ok(NotificationRepository::new(self.db)
            .unread_count(actor.id)
            .await?)
    }

    /// Marks one of the actor's notifications read.
    ///
    /// Someone else's notification reads as missing.
    pub async fn mark_read(&self, actor: &User, notification_id: i32) -> Result<Notification, AppError> {
        NotificationRepository::new(self.db)
            .mark_read(actor.id, notification_id)
            .await?
            .ok_or_else(not_found)
    }

    /// # Returns
    /// - `Ok(u64)` - Number of notifications that were unread
    pub async fn mark_all_read(&self, actor: &User) -> Result<u64, AppError> {
        Ok(NotificationRepository::new(self.db)
            .mark_all_read(actor.id)
            .await?)
    }

    pub async fn delete(&self, actor: &User, notification_id: i32) -> Result<(), AppError> {
        if !NotificationRepository::new(self.db)
            .delete(actor.id, notification_id)
            .await?
        {
            return Err(not_found());
        }

        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Notification not found".to_string())
}
