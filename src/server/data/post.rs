//! Posts, comments and likes.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::fetch_page,
    model::{
        post::{Comment, Post},
        CursorPage, CursorRequest, PageRequest, Paginated,
    },
};

pub struct PostRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PostRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, author_id: i32, content: String) -> Result<Post, DbErr> {
        let now = Utc::now();

        let entity = entity::post::ActiveModel {
            author_id: ActiveValue::Set(author_id),
            content: ActiveValue::Set(content),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Post::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Post>, DbErr> {
        let entity = entity::prelude::Post::find_by_id(id)
            .filter(entity::post::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Post::from_entity))
    }

    pub async fn update(&self, id: i32, content: String) -> Result<Post, DbErr> {
        let entity = entity::prelude::Post::find_by_id(id)
            .filter(entity::post::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("post {}", id)))?;

        let mut active: entity::post::ActiveModel = entity.into();
        active.content = ActiveValue::Set(content);
        active.updated_at = ActiveValue::Set(Utc::now());

        Ok(Post::from_entity(active.update(self.db).await?))
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Post::update_many()
            .col_expr(entity::post::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(entity::post::Column::Id.eq(id))
            .filter(entity::post::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Clears `deleted_at`. Returns false when the post is missing or not deleted.
    pub async fn restore(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Post::update_many()
            .col_expr(
                entity::post::Column::DeletedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(entity::post::Column::Id.eq(id))
            .filter(entity::post::Column::DeletedAt.is_not_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_by_author(&self, author_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Post::find()
            .filter(entity::post::Column::AuthorId.eq(author_id))
            .filter(entity::post::Column::DeletedAt.is_null())
            .count(self.db)
            .await
    }

    /// Posts by any of `author_ids`, newest first, starting below `cursor.before`.
    ///
    /// Fetches one extra row to learn whether another slice follows; when it does,
    /// `next_cursor` is the id of the last post returned.
    pub async fn by_authors(
        &self,
        author_ids: &[i32],
        cursor: CursorRequest,
    ) -> Result<CursorPage<Post>, DbErr> {
        if author_ids.is_empty() {
            return Ok(CursorPage {
                items: Vec::new(),
                next_cursor: None,
            });
        }

        let mut select = entity::prelude::Post::find()
            .filter(entity::post::Column::AuthorId.is_in(author_ids.iter().copied()))
            .filter(entity::post::Column::DeletedAt.is_null());

        if let Some(before) = cursor.before {
            select = select.filter(entity::post::Column::Id.lt(before));
        }

        let mut entities = select
            .order_by_desc(entity::post::Column::Id)
            .limit(cursor.limit + 1)
            .all(self.db)
            .await?;

        let has_more = entities.len() as u64 > cursor.limit;
        entities.truncate(cursor.limit as usize);

        let next_cursor = if has_more {
            entities.last().map(|post| post.id)
        } else {
            None
        };

        Ok(CursorPage {
            items: entities.into_iter().map(Post::from_entity).collect(),
            next_cursor,
        })
    }
}

pub struct CommentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        post_id: i32,
        author_id: i32,
        content: String,
    ) -> Result<Comment, DbErr> {
        let entity = entity::comment::ActiveModel {
            post_id: ActiveValue::Set(post_id),
            author_id: ActiveValue::Set(author_id),
            content: ActiveValue::Set(content),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Comment::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, DbErr> {
        let entity = entity::prelude::Comment::find_by_id(id)
            .filter(entity::comment::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Comment::from_entity))
    }

    /// Comments of a post in the order they were written.
    pub async fn list_for_post(
        &self,
        post_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Comment>, DbErr> {
        let select = entity::prelude::Comment::find()
            .filter(entity::comment::Column::PostId.eq(post_id))
            .filter(entity::comment::Column::DeletedAt.is_null())
            .order_by_asc(entity::comment::Column::CreatedAt)
            .order_by_asc(entity::comment::Column::Id);

        Ok(fetch_page(self.db, select, page)
            .await?
            .map(Comment::from_entity))
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Comment::update_many()
            .col_expr(entity::comment::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(entity::comment::Column::Id.eq(id))
            .filter(entity::comment::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Visible comment counts per post. Posts without comments are absent from the map.
    pub async fn count_for_posts(&self, post_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(i32, i64)> = entity::prelude::Comment::find()
            .select_only()
            .column(entity::comment::Column::PostId)
            .column_as(Expr::col(entity::comment::Column::Id).count(), "count")
            .filter(entity::comment::Column::PostId.is_in(post_ids.iter().copied()))
            .filter(entity::comment::Column::DeletedAt.is_null())
            .group_by(entity::comment::Column::PostId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(post_id, count)| (post_id, count as u64))
            .collect())
    }
}

pub struct LikeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LikeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn exists(&self, post_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let row = entity::prelude::PostLike::find_by_id((post_id, user_id))
            .one(self.db)
            .await?;

        Ok(row.is_some())
    }

    pub async fn create(&self, post_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::post_like::ActiveModel {
            post_id: ActiveValue::Set(post_id),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, post_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::PostLike::delete_by_id((post_id, user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Like counts per post. Posts without likes are absent from the map.
    pub async fn count_for_posts(&self, post_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(i32, i64)> = entity::prelude::PostLike::find()
            .select_only()
            .column(entity::post_like::Column::PostId)
            .column_as(Expr::col(entity::post_like::Column::UserId).count(), "count")
            .filter(entity::post_like::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(entity::post_like::Column::PostId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(post_id, count)| (post_id, count as u64))
            .collect())
    }

    /// The subset of `post_ids` that `user_id` has liked.
    pub async fn liked_by(&self, user_id: i32, post_ids: &[i32]) -> Result<HashSet<i32>, DbErr> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let liked: Vec<i32> = entity::prelude::PostLike::find()
            .select_only()
            .column(entity::post_like::Column::PostId)
            .filter(entity::post_like::Column::UserId.eq(user_id))
            .filter(entity::post_like::Column::PostId.is_in(post_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(liked.into_iter().collect())
    }
}
