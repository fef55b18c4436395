//! Follow edges and follow requests.
//!
//! `FollowRepository` manages the `follow` join table keyed by (follower, following), and
//! `FollowRequestRepository` stores the pending requests addressed to private accounts.
//! Neither repository enforces the state machine; services check transitions first.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Query},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::fetch_page,
    model::{
        follow::{FollowRequest, FollowRequestStatus},
        user::User,
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

pub struct FollowRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FollowRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Checks whether `follower_id` follows `following_id`.
    pub async fn exists(&self, follower_id: i32, following_id: i32) -> Result<bool, DbErr> {
        let edge = entity::prelude::Follow::find_by_id((follower_id, following_id))
            .one(self.db)
            .await?;

        Ok(edge.is_some())
    }

    /// Inserts a follow edge.
    ///
    /// Fails with a unique constraint error when the edge already exists; services check
    /// `exists` first to answer with a conflict instead.
    pub async fn create(&self, follower_id: i32, following_id: i32) -> Result<(), DbErr> {
        entity::follow::ActiveModel {
            follower_id: ActiveValue::Set(follower_id),
            following_id: ActiveValue::Set(following_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Deletes a follow edge.
    ///
    /// # Returns
    /// - `Ok(true)` - The edge existed and was removed
    /// - `Ok(false)` - There was no such edge
    pub async fn delete(&self, follower_id: i32, following_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Follow::delete_by_id((follower_id, following_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Number of active users following `user_id`.
    pub async fn follower_count(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::DeletedAt.is_null())
            .filter(
                entity::user::Column::Id.in_subquery(
                    Query::select()
                        .column(entity::follow::Column::FollowerId)
                        .from(entity::follow::Entity)
                        .and_where(entity::follow::Column::FollowingId.eq(user_id))
                        .to_owned(),
                ),
            )
            .count(self.db)
            .await
    }

    /// Number of active users `user_id` follows.
    pub async fn following_count(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::DeletedAt.is_null())
            .filter(
                entity::user::Column::Id.in_subquery(
                    Query::select()
                        .column(entity::follow::Column::FollowingId)
                        .from(entity::follow::Entity)
                        .and_where(entity::follow::Column::FollowerId.eq(user_id))
                        .to_owned(),
                ),
            )
            .count(self.db)
            .await
    }

    /// Active users following `user_id`, ordered by username.
    pub async fn followers(&self, user_id: i32, page: PageRequest) -> Result<Paginated<User>, DbErr> {
        let select = entity::prelude::User::find()
            .filter(entity::user::Column::DeletedAt.is_null())
            .filter(
                entity::user::Column::Id.in_subquery(
                    Query::select()
                        .column(entity::follow::Column::FollowerId)
                        .from(entity::follow::Entity)
                        .and_where(entity::follow::Column::FollowingId.eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(entity::user::Column::Username);

        Ok(fetch_page(self.db, select, page).await?.map(User::from_entity))
    }

    /// Active users `user_id` follows, ordered by username.
    pub async fn following(&self, user_id: i32, page: PageRequest) -> Result<Paginated<User>, DbErr> {
        let select = entity::prelude::User::find()
            .filter(entity::user::Column::DeletedAt.is_null())
            .filter(
                entity::user::Column::Id.in_subquery(
                    Query::select()
                        .column(entity::follow::Column::FollowingId)
                        .from(entity::follow::Entity)
                        .and_where(entity::follow::Column::FollowerId.eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(entity::user::Column::Username);

        Ok(fetch_page(self.db, select, page).await?.map(User::from_entity))
    }

    /// Ids of every user `user_id` follows.
    pub async fn following_ids(&self, user_id: i32) -> Result<HashSet<i32>, DbErr> {
        let ids: Vec<i32> = entity::prelude::Follow::find()
            .select_only()
            .column(entity::follow::Column::FollowingId)
            .filter(entity::follow::Column::FollowerId.eq(user_id))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(ids.into_iter().collect())
    }
}

pub struct FollowRequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FollowRequestRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a pending follow request.
    pub async fn create(&self, requester_id: i32, target_id: i32) -> Result<FollowRequest, DbErr> {
        let entity = entity::follow_request::ActiveModel {
            requester_id: ActiveValue::Set(requester_id),
            target_id: ActiveValue::Set(target_id),
            status: ActiveValue::Set(FollowRequestStatus::Pending.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            responded_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        FollowRequest::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<FollowRequest>, DbErr> {
        entity::prelude::FollowRequest::find_by_id(id)
            .one(self.db)
            .await?
            .map(FollowRequest::from_entity)
            .transpose()
    }

    /// Finds the open request from `requester_id` to `target_id`, if any.
    pub async fn find_pending(
        &self,
        requester_id: i32,
        target_id: i32,
    ) -> Result<Option<FollowRequest>, DbErr> {
        entity::prelude::FollowRequest::find()
            .filter(entity::follow_request::Column::RequesterId.eq(requester_id))
            .filter(entity::follow_request::Column::TargetId.eq(target_id))
            .filter(
                entity::follow_request::Column::Status.eq(FollowRequestStatus::Pending.as_str()),
            )
            .one(self.db)
            .await?
            .map(FollowRequest::from_entity)
            .transpose()
    }

    /// Moves a request to `status` and stamps `responded_at`.
    ///
    /// The update is conditional on the row still being pending, so a concurrent
    /// response cannot overwrite a terminal state.
    ///
    /// # Returns
    /// - `Ok(true)` - The request was pending and has been updated
    /// - `Ok(false)` - The request no longer exists or was not pending
    pub async fn set_status(&self, id: i32, status: FollowRequestStatus) -> Result<bool, DbErr> {
        let result = entity::prelude::FollowRequest::update_many()
            .col_expr(
                entity::follow_request::Column::Status,
                Expr::value(status.as_str()),
            )
            .col_expr(
                entity::follow_request::Column::RespondedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::follow_request::Column::Id.eq(id))
            .filter(
                entity::follow_request::Column::Status.eq(FollowRequestStatus::Pending.as_str()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Pending requests addressed to `target_id`, newest first.
    pub async fn incoming(
        &self,
        target_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<FollowRequest>, DbErr> {
        let select = entity::prelude::FollowRequest::find()
            .filter(entity::follow_request::Column::TargetId.eq(target_id))
            .filter(
                entity::follow_request::Column::Status.eq(FollowRequestStatus::Pending.as_str()),
            )
            .order_by_desc(entity::follow_request::Column::CreatedAt)
            .order_by_desc(entity::follow_request::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(FollowRequest::from_entity)
    }

    /// Pending requests sent by `requester_id`, newest first.
    pub async fn outgoing(
        &self,
        requester_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<FollowRequest>, DbErr> {
        let select = entity::prelude::FollowRequest::find()
            .filter(entity::follow_request::Column::RequesterId.eq(requester_id))
            .filter(
                entity::follow_request::Column::Status.eq(FollowRequestStatus::Pending.as_str()),
            )
            .order_by_desc(entity::follow_request::Column::CreatedAt)
            .order_by_desc(entity::follow_request::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(FollowRequest::from_entity)
    }

    /// Every pending request addressed to `target_id`, oldest first.
    pub async fn pending_for_target(&self, target_id: i32) -> Result<Vec<FollowRequest>, DbErr> {
        entity::prelude::FollowRequest::find()
            .filter(entity::follow_request::Column::TargetId.eq(target_id))
            .filter(
                entity::follow_request::Column::Status.eq(FollowRequestStatus::Pending.as_str()),
            )
            .order_by_asc(entity::follow_request::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(FollowRequest::from_entity)
            .collect()
    }
}
