//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing user records in the database.
//! It handles account upserts on login, profile updates, search and admin status, and
//! hides soft-deleted accounts from every lookup except the uniqueness checks.

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::fetch_page,
    model::{
        user::{username_from_email, UpdateProfileParam, UpsertUserParam, User},
        PageRequest, Paginated,
    },
    util::token::random_alphanumeric,
};

/// Repository providing database operations for user management.
pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection or an open transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates the user on first login or refreshes their email and name.
    ///
    /// New users get a username derived from their email's local part. When that
    /// username is taken, the row is inserted with a throwaway username first and then
    /// renamed to `{base}_{id}`, which is unique because ids are.
    ///
    /// The admin flag is only written when `param.is_admin` is `Some`.
    ///
    /// # Returns
    /// - `Ok(User)` - The created or updated user
    /// - `Err(DbErr)` - Database error during insert or update
    pub async fn upsert(&self, param: UpsertUserParam) -> Result<User, DbErr> {
        let now = Utc::now();

        let existing = entity::prelude::User::find()
            .filter(entity::user::Column::AuthSubject.eq(&param.auth_subject))
            .one(self.db)
            .await?;

        if let Some(existing) = existing {
            let mut active: entity::user::ActiveModel = existing.into();
            active.email = ActiveValue::Set(param.email);
            active.name = ActiveValue::Set(param.name);
            if let Some(is_admin) = param.is_admin {
                active.is_admin = ActiveValue::Set(is_admin);
            }
            active.updated_at = ActiveValue::Set(now);

            let updated = active.update(self.db).await?;
            return Ok(User::from_entity(updated));
        }

        let base = username_from_email(&param.email);
        let clash = self.username_exists(&base).await?;
        let username = if clash {
            format!("tmp_{}", random_alphanumeric(20).to_lowercase())
        } else {
            base.clone()
        };

        let created = entity::user::ActiveModel {
            auth_subject: ActiveValue::Set(param.auth_subject),
            email: ActiveValue::Set(param.email),
            username: ActiveValue::Set(username),
            name: ActiveValue::Set(param.name),
            headline: ActiveValue::Set(None),
            bio: ActiveValue::Set(None),
            avatar_url: ActiveValue::Set(None),
            is_private: ActiveValue::Set(false),
            is_admin: ActiveValue::Set(param.is_admin.unwrap_or(false)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        if !clash {
            return Ok(User::from_entity(created));
        }

        let id = created.id;
        let mut active: entity::user::ActiveModel = created.into();
        active.username = ActiveValue::Set(format!("{}_{}", base, id));
        let renamed = active.update(self.db).await?;

        Ok(User::from_entity(renamed))
    }

    /// Finds an active (not soft-deleted) user by id.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(id)
            .filter(entity::user::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds an active user by their email address, compared case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(entity::user::Column::Email)))
                    .eq(email.trim().to_lowercase()),
            )
            .filter(entity::user::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Loads the active users among `ids`, in no particular order.
    pub async fn find_many(&self, ids: &[i32]) -> Result<Vec<User>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(ids.iter().copied()))
            .filter(entity::user::Column::DeletedAt.is_null())
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(User::from_entity).collect())
    }

    /// Checks whether any account, deleted or not, holds `username`.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::User::find()
            .filter(entity::user::Column::Username.eq(username))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks whether any admin users exist in the database.
    ///
    /// Used during startup to decide whether to print an admin bootstrap link.
    pub async fn admin_exists(&self) -> Result<bool, DbErr> {
        let admin_count = entity::prelude::User::find()
            .filter(entity::user::Column::IsAdmin.eq(true))
            .filter(entity::user::Column::DeletedAt.is_null())
            .count(self.db)
            .await?;

        Ok(admin_count > 0)
    }

    /// Grants or revokes platform admin. Silently succeeds for unknown ids.
    pub async fn set_admin(&self, id: i32, is_admin: bool) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .col_expr(entity::user::Column::IsAdmin, Expr::value(is_admin))
            .col_expr(entity::user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::user::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Overwrites the editable profile fields.
    ///
    /// # Returns
    /// - `Ok(User)` - The updated user
    /// - `Err(DbErr::RecordNotFound)` - No active user with that id
    pub async fn update_profile(&self, id: i32, param: UpdateProfileParam) -> Result<User, DbErr> {
        let entity = entity::prelude::User::find_by_id(id)
            .filter(entity::user::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {}", id)))?;

        let mut active: entity::user::ActiveModel = entity.into();
        active.name = ActiveValue::Set(param.name);
        active.username = ActiveValue::Set(param.username);
        active.headline = ActiveValue::Set(param.headline);
        active.bio = ActiveValue::Set(param.bio);
        active.avatar_url = ActiveValue::Set(param.avatar_url);
        active.is_private = ActiveValue::Set(param.is_private);
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(self.db).await?;

        Ok(User::from_entity(updated))
    }

    /// Searches active users whose name or username contains `query`, ignoring case.
    pub async fn search(&self, query: &str, page: PageRequest) -> Result<Paginated<User>, DbErr> {
        let pattern = format!("%{}%", query.trim().to_lowercase());

        let select = entity::prelude::User::find()
            .filter(entity::user::Column::DeletedAt.is_null())
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(entity::user::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(entity::user::Column::Username)))
                            .like(pattern),
                    ),
            )
            .order_by_asc(entity::user::Column::Username);

        Ok(fetch_page(self.db, select, page).await?.map(User::from_entity))
    }
}
