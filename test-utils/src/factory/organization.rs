//! Factories for organizations, memberships, schools and faculties.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test organizations.
pub struct OrganizationFactory<'a> {
    db: &'a DatabaseConnection,
    created_by: i32,
    name: String,
    slug: String,
    deleted: bool,
}

impl<'a> OrganizationFactory<'a> {
    /// Defaults: name `"Organization {id}"`, slug `"org-{id}"`.
    pub fn new(db: &'a DatabaseConnection, created_by: i32) -> Self {
        let id = next_id();
        Self {
            db,
            created_by,
            name: format!("Organization {}", id),
            slug: format!("org-{}", id),
            deleted: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    pub async fn build(self) -> Result<entity::organization::Model, DbErr> {
        let now = Utc::now();
        entity::organization::ActiveModel {
            name: ActiveValue::Set(self.name),
            slug: ActiveValue::Set(self.slug),
            description: ActiveValue::Set(None),
            website: ActiveValue::Set(None),
            created_by: ActiveValue::Set(self.created_by),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(self.deleted.then_some(now)),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an organization with default values. No membership row is created.
pub async fn create_organization(
    db: &DatabaseConnection,
    created_by: i32,
) -> Result<entity::organization::Model, DbErr> {
    OrganizationFactory::new(db, created_by).build().await
}

/// Adds a membership row with the given role (`owner`, `admin`, `instructor`, `member`).
pub async fn create_member(
    db: &DatabaseConnection,
    organization_id: i32,
    user_id: i32,
    role: &str,
) -> Result<entity::organization_member::Model, DbErr> {
    create_member_joined_at(db, organization_id, user_id, role, Utc::now()).await
}

/// Adds a membership row with an explicit join time, for ordering-sensitive tests.
pub async fn create_member_joined_at(
    db: &DatabaseConnection,
    organization_id: i32,
    user_id: i32,
    role: &str,
    joined_at: chrono::DateTime<Utc>,
) -> Result<entity::organization_member::Model, DbErr> {
    entity::organization_member::ActiveModel {
        organization_id: ActiveValue::Set(organization_id),
        user_id: ActiveValue::Set(user_id),
        role: ActiveValue::Set(role.to_string()),
        joined_at: ActiveValue::Set(joined_at),
    }
    .insert(db)
    .await
}

/// Creates a school under the organization.
pub async fn create_school(
    db: &DatabaseConnection,
    organization_id: i32,
) -> Result<entity::school::Model, DbErr> {
    entity::school::ActiveModel {
        organization_id: ActiveValue::Set(organization_id),
        name: ActiveValue::Set(format!("School {}", next_id())),
        description: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Creates a faculty under the school; `organization_id` must match the school's.
pub async fn create_faculty(
    db: &DatabaseConnection,
    organization_id: i32,
    school_id: i32,
) -> Result<entity::faculty::Model, DbErr> {
    entity::faculty::ActiveModel {
        school_id: ActiveValue::Set(school_id),
        organization_id: ActiveValue::Set(organization_id),
        name: ActiveValue::Set(format!("Faculty {}", next_id())),
        description: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
