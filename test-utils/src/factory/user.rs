//! User factory for creating test user entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let user = UserFactory::new(&db)
///     .email("ada@example.edu")
///     .private(true)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    auth_subject: String,
    email: String,
    username: String,
    name: String,
    is_private: bool,
    is_admin: bool,
    deleted: bool,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - auth_subject: `"subject-{id}"`
    /// - email: `"user{id}@example.edu"`
    /// - username: `"user{id}"`
    /// - name: `"User {id}"`
    /// - public, not admin, not deleted
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            auth_subject: format!("subject-{}", id),
            email: format!("user{}@example.edu", id),
            username: format!("user{}", id),
            name: format!("User {}", id),
            is_private: false,
            is_admin: false,
            deleted: false,
        }
    }

    pub fn auth_subject(mut self, auth_subject: impl Into<String>) -> Self {
        self.auth_subject = auth_subject.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Makes the profile private so follows go through follow requests.
    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Grants platform admin privileges.
    pub fn admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Marks the user as soft-deleted.
    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    /// Builds and inserts the user entity into the database.
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        let now = Utc::now();
        entity::user::ActiveModel {
            auth_subject: ActiveValue::Set(self.auth_subject),
            email: ActiveValue::Set(self.email),
            username: ActiveValue::Set(self.username),
            name: ActiveValue::Set(self.name),
            headline: ActiveValue::Set(None),
            bio: ActiveValue::Set(None),
            avatar_url: ActiveValue::Set(None),
            is_private: ActiveValue::Set(self.is_private),
            is_admin: ActiveValue::Set(self.is_admin),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(self.deleted.then_some(now)),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a public, non-admin user with default values.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates a private user with default values.
pub async fn create_private_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).private(true).build().await
}

/// Creates a platform admin with default values.
pub async fn create_admin(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).admin(true).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_user_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = create_user(db).await?;

        assert!(user.email.ends_with("@example.edu"));
        assert!(!user.is_private);
        assert!(!user.is_admin);
        assert!(user.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn creates_multiple_unique_users() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let first = create_user(db).await?;
        let second = create_user(db).await?;

        assert_ne!(first.email, second.email);
        assert_ne!(first.username, second.username);
        assert_ne!(first.auth_subject, second.auth_subject);

        Ok(())
    }

    #[tokio::test]
    async fn creates_deleted_private_user() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = UserFactory::new(db)
            .private(true)
            .deleted(true)
            .build()
            .await?;

        assert!(user.is_private);
        assert!(user.deleted_at.is_some());

        Ok(())
    }
}
