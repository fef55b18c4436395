use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::fetch_page,
    model::{
        notification::{CreateNotificationParam, Notification},
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

pub struct NotificationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateNotificationParam) -> Result<Notification, DbErr> {
        let entity = entity::notification::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            actor_id: ActiveValue::Set(param.actor_id),
            kind: ActiveValue::Set(param.kind.as_str().to_string()),
            message: ActiveValue::Set(param.message),
            link: ActiveValue::Set(param.link),
            read_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Notification::from_entity(entity)
    }

    /// Notifications for `user_id`, newest first.
    pub async fn list(
        &self,
        user_id: i32,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Paginated<Notification>, DbErr> {
        let mut select = entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id));

        if unread_only {
            select = select.filter(entity::notification::Column::ReadAt.is_null());
        }

        let select = select
            .order_by_desc(entity::notification::Column::CreatedAt)
            .order_by_desc(entity::notification::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(Notification::from_entity)
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::ReadAt.is_null())
            .count(self.db)
            .await
    }

    /// Marks one of `user_id`'s notifications as read.
    ///
    /// Already read notifications keep their original `read_at`.
    ///
    /// # Returns
    /// - `Ok(Some(Notification))` - The notification, now read
    /// - `Ok(None)` - No such notification for this user
    pub async fn mark_read(&self, user_id: i32, id: i32) -> Result<Option<Notification>, DbErr> {
        let Some(entity) = entity::prelude::Notification::find_by_id(id)
            .filter(entity::notification::Column::UserId.eq(user_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        if entity.read_at.is_some() {
            return Notification::from_entity(entity).map(Some);
        }

        let mut active: entity::notification::ActiveModel = entity.into();
        active.read_at = ActiveValue::Set(Some(Utc::now()));
        let updated = active.update(self.db).await?;

        Notification::from_entity(updated).map(Some)
    }

    /// Marks every unread notification of `user_id` as read, returning how many changed.
    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .col_expr(entity::notification::Column::ReadAt, Expr::value(Utc::now()))
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::ReadAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, user_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Notification::delete_many()
            .filter(entity::notification::Column::Id.eq(id))
            .filter(entity::notification::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
