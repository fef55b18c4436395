//! Database repository layer for all domain entities.
//!
//! Repositories use SeaORM entity models internally and return domain models from
//! `server::model`, parsing stored status strings at this boundary. Each repository is
//! generic over `ConnectionTrait`, so the same code runs against the connection pool or
//! inside a `DatabaseTransaction` when a service needs several writes to commit together.

pub mod audit;
pub mod club;
pub mod course;
pub mod follow;
pub mod invitation;
pub mod job;
pub mod notification;
pub mod organization;
pub mod post;
pub mod research;
pub mod user;

#[cfg(test)]
mod test;

use std::collections::HashMap;

use sea_orm::{
    sea_query::{Query, SelectStatement},
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, Select,
};

use crate::server::{
    data::user::UserRepository,
    model::{user::User, PageRequest, Paginated},
};

/// Runs `select` as one offset page and collects the totals alongside.
pub(crate) async fn fetch_page<C, E>(
    db: &C,
    select: Select<E>,
    page: PageRequest,
) -> Result<Paginated<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync,
{
    let paginator = select.paginate(db, page.per_page);
    let totals = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(page.page).await?;

    Ok(Paginated {
        items,
        total: totals.number_of_items,
        page: page.page,
        per_page: page.per_page,
        total_pages: totals.number_of_pages,
    })
}

/// Subquery selecting the ids of users that have not been soft-deleted.
///
/// Join tables filter on it so rows belonging to deleted accounts disappear from reads.
pub(crate) fn active_user_ids() -> SelectStatement {
    Query::select()
        .column(entity::user::Column::Id)
        .from(entity::user::Entity)
        .and_where(entity::user::Column::DeletedAt.is_null())
        .to_owned()
}

/// Loads the active users among `ids` keyed by id, for joining onto other rows.
pub(crate) async fn users_by_id<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, User>, DbErr> {
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    let users = UserRepository::new(db).find_many(&ids).await?;

    Ok(users.into_iter().map(|user| (user.id, user)).collect())
}
