//! Organizations, memberships, schools and faculties.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func, Query},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    data::{active_user_ids, fetch_page, users_by_id},
    model::{
        organization::{
            CreateOrganizationParam, Faculty, FacultyMember, Member, Membership, OrgRole,
            Organization, School, UnitParam, UpdateOrganizationParam,
        },
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

/// Repository for organization records. Soft-deleted organizations are never returned.
pub struct OrganizationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OrganizationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts the organization row only; the creator's owner membership is added separately.
    pub async fn create(&self, param: CreateOrganizationParam) -> Result<Organization, DbErr> {
        let now = Utc::now();

        let entity = entity::organization::ActiveModel {
            name: ActiveValue::Set(param.name),
            slug: ActiveValue::Set(param.slug),
            description: ActiveValue::Set(param.description),
            website: ActiveValue::Set(param.website),
            created_by: ActiveValue::Set(param.created_by),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Organization::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Organization>, DbErr> {
        let entity = entity::prelude::Organization::find_by_id(id)
            .filter(entity::organization::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Organization::from_entity))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, DbErr> {
        let entity = entity::prelude::Organization::find()
            .filter(entity::organization::Column::Slug.eq(slug))
            .filter(entity::organization::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Organization::from_entity))
    }

    /// Checks slug uniqueness, counting soft-deleted organizations since the column is unique.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Organization::find()
            .filter(entity::organization::Column::Slug.eq(slug))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// All organizations ordered by name.
    pub async fn list(&self, page: PageRequest) -> Result<Paginated<Organization>, DbErr> {
        let select = entity::prelude::Organization::find()
            .filter(entity::organization::Column::DeletedAt.is_null())
            .order_by_asc(entity::organization::Column::Name)
            .order_by_asc(entity::organization::Column::Id);

        Ok(fetch_page(self.db, select, page)
            .await?
            .map(Organization::from_entity))
    }

    /// Organizations `user_id` belongs to, ordered by name.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Organization>, DbErr> {
        let entities = entity::prelude::Organization::find()
            .filter(entity::organization::Column::DeletedAt.is_null())
            .filter(
                entity::organization::Column::Id.in_subquery(
                    Query::select()
                        .column(entity::organization_member::Column::OrganizationId)
                        .from(entity::organization_member::Entity)
                        .and_where(entity::organization_member::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(entity::organization::Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Organization::from_entity).collect())
    }

    /// # Returns
    /// - `Ok(Organization)` - The updated organization
    /// - `Err(DbErr::RecordNotFound)` - No active organization with that id
    pub async fn update(
        &self,
        id: i32,
        param: UpdateOrganizationParam,
    ) -> Result<Organization, DbErr> {
        let entity = entity::prelude::Organization::find_by_id(id)
            .filter(entity::organization::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("organization {}", id)))?;

        let mut active: entity::organization::ActiveModel = entity.into();
        active.name = ActiveValue::Set(param.name);
        active.description = ActiveValue::Set(param.description);
        active.website = ActiveValue::Set(param.website);
        active.updated_at = ActiveValue::Set(Utc::now());

        Ok(Organization::from_entity(active.update(self.db).await?))
    }

    /// Marks the organization deleted. Returns false when it was already deleted or missing.
    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Organization::update_many()
            .col_expr(
                entity::organization::Column::DeletedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::organization::Column::Id.eq(id))
            .filter(entity::organization::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Repository for organization memberships.
pub struct MemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn add(
        &self,
        organization_id: i32,
        user_id: i32,
        role: OrgRole,
    ) -> Result<Membership, DbErr> {
        let entity = entity::organization_member::ActiveModel {
            organization_id: ActiveValue::Set(organization_id),
            user_id: ActiveValue::Set(user_id),
            role: ActiveValue::Set(role.as_str().to_string()),
            joined_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Membership::from_entity(entity)
    }

    pub async fn find(
        &self,
        organization_id: i32,
        user_id: i32,
    ) -> Result<Option<Membership>, DbErr> {
        entity::prelude::OrganizationMember::find_by_id((organization_id, user_id))
            .one(self.db)
            .await?
            .map(Membership::from_entity)
            .transpose()
    }

    /// Finds the membership of the active user registered under `email`.
    pub async fn find_by_email(
        &self,
        organization_id: i32,
        email: &str,
    ) -> Result<Option<Membership>, DbErr> {
        entity::prelude::OrganizationMember::find()
            .filter(entity::organization_member::Column::OrganizationId.eq(organization_id))
            .filter(
                entity::organization_member::Column::UserId.in_subquery(
                    Query::select()
                        .column(entity::user::Column::Id)
                        .from(entity::user::Entity)
                        .and_where(
                            Expr::expr(Func::lower(Expr::col((
                                entity::user::Entity,
                                entity::user::Column::Email,
                            ))))
                            .eq(email.trim().to_lowercase()),
                        )
                        .and_where(entity::user::Column::DeletedAt.is_null())
                        .to_owned(),
                ),
            )
            .one(self.db)
            .await?
            .map(Membership::from_entity)
            .transpose()
    }

    pub async fn set_role(
        &self,
        organization_id: i32,
        user_id: i32,
        role: OrgRole,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::OrganizationMember::update_many()
            .col_expr(
                entity::organization_member::Column::Role,
                Expr::value(role.as_str()),
            )
            .filter(entity::organization_member::Column::OrganizationId.eq(organization_id))
            .filter(entity::organization_member::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, organization_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result =
            entity::prelude::OrganizationMember::delete_by_id((organization_id, user_id))
                .exec(self.db)
                .await?;

        Ok(result.rows_affected > 0)
    }

    /// Members of an organization with their profiles, oldest membership first.
    pub async fn list(
        &self,
        organization_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Member>, DbErr> {
        let select = entity::prelude::OrganizationMember::find()
            .filter(entity::organization_member::Column::OrganizationId.eq(organization_id))
            .filter(entity::organization_member::Column::UserId.in_subquery(active_user_ids()))
            .order_by_asc(entity::organization_member::Column::JoinedAt)
            .order_by_asc(entity::organization_member::Column::UserId);

        let rows = fetch_page(self.db, select, page).await?;
        let mut users = users_by_id(self.db, rows.items.iter().map(|row| row.user_id)).await?;

        let memberships = rows.try_map(Membership::from_entity)?;
        let items = memberships
            .items
            .iter()
            .filter_map(|membership| {
                users.remove(&membership.user_id).map(|user| Member {
                    user,
                    role: membership.role,
                    joined_at: membership.joined_at,
                })
            })
            .collect();

        Ok(memberships.with_items(items))
    }

    /// Number of members holding `role`.
    pub async fn count_role(&self, organization_id: i32, role: OrgRole) -> Result<u64, DbErr> {
        entity::prelude::OrganizationMember::find()
            .filter(entity::organization_member::Column::OrganizationId.eq(organization_id))
            .filter(entity::organization_member::Column::Role.eq(role.as_str()))
            .count(self.db)
            .await
    }

    /// Picks the reviewer for a course submitted by `submitted_by`.
    ///
    /// Admins are preferred over owners; within a role the earliest joined member wins.
    /// The submitter and deleted accounts are never picked.
    pub async fn first_reviewer(
        &self,
        organization_id: i32,
        submitted_by: i32,
    ) -> Result<Option<i32>, DbErr> {
        for role in [OrgRole::Admin, OrgRole::Owner] {
            let candidate = entity::prelude::OrganizationMember::find()
                .filter(entity::organization_member::Column::OrganizationId.eq(organization_id))
                .filter(entity::organization_member::Column::Role.eq(role.as_str()))
                .filter(entity::organization_member::Column::UserId.ne(submitted_by))
                .filter(
                    entity::organization_member::Column::UserId.in_subquery(active_user_ids()),
                )
                .order_by_asc(entity::organization_member::Column::JoinedAt)
                .order_by_asc(entity::organization_member::Column::UserId)
                .one(self.db)
                .await?;

            if let Some(candidate) = candidate {
                return Ok(Some(candidate.user_id));
            }
        }

        Ok(None)
    }
}

pub struct SchoolRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SchoolRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, organization_id: i32, param: UnitParam) -> Result<School, DbErr> {
        let entity = entity::school::ActiveModel {
            organization_id: ActiveValue::Set(organization_id),
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(School::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<School>, DbErr> {
        let entity = entity::prelude::School::find_by_id(id).one(self.db).await?;

        Ok(entity.map(School::from_entity))
    }

    pub async fn list(&self, organization_id: i32) -> Result<Vec<School>, DbErr> {
        let entities = entity::prelude::School::find()
            .filter(entity::school::Column::OrganizationId.eq(organization_id))
            .order_by_asc(entity::school::Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(School::from_entity).collect())
    }

    pub async fn update(&self, id: i32, param: UnitParam) -> Result<School, DbErr> {
        let entity = entity::prelude::School::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("school {}", id)))?;

        let mut active: entity::school::ActiveModel = entity.into();
        active.name = ActiveValue::Set(param.name);
        active.description = ActiveValue::Set(param.description);

        Ok(School::from_entity(active.update(self.db).await?))
    }

    /// Deletes the school; its faculties and their members cascade.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::School::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

pub struct FacultyRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FacultyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a faculty under `school`, inheriting the school's organization.
    pub async fn create(&self, school: &School, param: UnitParam) -> Result<Faculty, DbErr> {
        let entity = entity::faculty::ActiveModel {
            school_id: ActiveValue::Set(school.id),
            organization_id: ActiveValue::Set(school.organization_id),
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Faculty::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Faculty>, DbErr> {
        let entity = entity::prelude::Faculty::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Faculty::from_entity))
    }

    pub async fn list_for_school(&self, school_id: i32) -> Result<Vec<Faculty>, DbErr> {
        let entities = entity::prelude::Faculty::find()
            .filter(entity::faculty::Column::SchoolId.eq(school_id))
            .order_by_asc(entity::faculty::Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Faculty::from_entity).collect())
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Faculty::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_member(&self, faculty_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let row = entity::prelude::FacultyMember::find_by_id((faculty_id, user_id))
            .one(self.db)
            .await?;

        Ok(row.is_some())
    }

    pub async fn add_member(
        &self,
        faculty_id: i32,
        user_id: i32,
        title: Option<String>,
    ) -> Result<DateTime<Utc>, DbErr> {
        let entity = entity::faculty_member::ActiveModel {
            faculty_id: ActiveValue::Set(faculty_id),
            user_id: ActiveValue::Set(user_id),
            title: ActiveValue::Set(title),
            joined_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(entity.joined_at)
    }

    pub async fn remove_member(&self, faculty_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::FacultyMember::delete_by_id((faculty_id, user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Faculty members with their profiles, ordered by join date.
    pub async fn members(&self, faculty_id: i32) -> Result<Vec<FacultyMember>, DbErr> {
        let rows = entity::prelude::FacultyMember::find()
            .filter(entity::faculty_member::Column::FacultyId.eq(faculty_id))
            .filter(entity::faculty_member::Column::UserId.in_subquery(active_user_ids()))
            .order_by_asc(entity::faculty_member::Column::JoinedAt)
            .all(self.db)
            .await?;

        let mut users = users_by_id(self.db, rows.iter().map(|row| row.user_id)).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                users.remove(&row.user_id).map(|user| FacultyMember {
                    user,
                    title: row.title,
                    joined_at: row.joined_at,
                })
            })
            .collect())
    }
}
