//! Organizations, their members and the school / faculty hierarchy beneath them.

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        audit::AuditRepository,
        organization::{
            FacultyRepository, MemberRepository, OrganizationRepository, SchoolRepository,
        },
    },
    error::{validation::ValidationError, AppError},
    model::{
        audit::{entity_type, RecordAuditParam},
        organization::{
            is_valid_slug, CreateOrganizationParam, Faculty, FacultyMember, Member, Membership,
            OrgRole, Organization, School, UnitParam, UpdateOrganizationParam,
        },
        user::User,
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

/// Loads an organization that has not been deleted.
pub(crate) async fn find_organization<C: ConnectionTrait>(
    db: &C,
    organization_id: i32,
) -> Result<Organization, AppError> {
    OrganizationRepository::new(db)
        .find_by_id(organization_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))
}

/// Requires `user_id` to hold a role in `organization_id` that satisfies `allowed`.
///
/// # Returns
/// - `Ok(Membership)` - The caller's membership
/// - `Err(AppError::Forbidden)` - Not a member, or the role is insufficient
pub(crate) async fn require_org_role<C, F>(
    db: &C,
    organization_id: i32,
    user_id: i32,
    allowed: F,
) -> Result<Membership, AppError>
where
    C: ConnectionTrait,
    F: Fn(OrgRole) -> bool,
{
    let membership = MemberRepository::new(db)
        .find(organization_id, user_id)
        .await?;

    match membership {
        Some(membership) if allowed(membership.role) => Ok(membership),
        Some(_) => Err(AppError::Forbidden(
            "Your role in this organization does not allow this".to_string(),
        )),
        None => Err(AppError::Forbidden(
            "You are not a member of this organization".to_string(),
        )),
    }
}

/// The caller's role in `organization_id`, if any.
pub(crate) async fn org_role<C: ConnectionTrait>(
    db: &C,
    organization_id: i32,
    user_id: i32,
) -> Result<Option<OrgRole>, AppError> {
    Ok(MemberRepository::new(db)
        .find(organization_id, user_id)
        .await?
        .map(|membership| membership.role))
}

pub struct OrganizationService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> OrganizationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an organization owned by its creator.
    ///
    /// # Returns
    /// - `Ok(Organization)` - The new organization; the creator holds the owner role
    /// - `Err(AppError::Validation)` - Name, slug, description or website invalid
    /// - `Err(AppError::Conflict)` - The slug is taken
    pub async fn create(
        &self,
        actor: &User,
        mut param: CreateOrganizationParam,
    ) -> Result<Organization, AppError> {
        param.name = param.name.trim().to_string();
        param.slug = param.slug.trim().to_lowercase();

        let mut errors = ValidationError::new();
        errors.check_length("name", &param.name, 1, 200);
        errors.check(
            "slug",
            is_valid_slug(&param.slug),
            "must be 3 to 50 characters of a-z, 0-9 or -",
        );
        check_details(&mut errors, param.description.as_deref(), param.website.as_deref());
        errors.finish()?;

        let org_repo = OrganizationRepository::new(self.db);
        if org_repo.slug_exists(&param.slug).await? {
            return Err(AppError::Conflict("Slug is already taken".to_string()));
        }

        param.created_by = actor.id;

        let txn = self.db.begin().await?;
        let organization = OrganizationRepository::new(&txn).create(param).await?;
        MemberRepository::new(&txn)
            .add(organization.id, actor.id, OrgRole::Owner)
            .await?;
        AuditRepository::new(&txn)
            .record(RecordAuditParam::new(
                actor.id,
                "organization.created",
                entity_type::ORGANIZATION,
                organization.id,
            ))
            .await?;
        txn.commit().await?;

        tracing::info!(
            "User {} created organization {} ({})",
            actor.id,
            organization.id,
            organization.slug
        );

        Ok(organization)
    }

    pub async fn get(&self, organization_id: i32) -> Result<Organization, AppError> {
        find_organization(self.db, organization_id).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Organization, AppError> {
        OrganizationRepository::new(self.db)
            .find_by_slug(&slug.to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Paginated<Organization>, AppError> {
        Ok(OrganizationRepository::new(self.db).list(page).await?)
    }

    /// Organizations the actor belongs to.
    pub async fn list_mine(&self, actor: &User) -> Result<Vec<Organization>, AppError> {
        Ok(OrganizationRepository::new(self.db)
            .list_for_user(actor.id)
            .await?)
    }

    /// Updates name, description and website. Owners and admins only.
    pub async fn update(
        &self,
        actor: &User,
        organization_id: i32,
        mut param: UpdateOrganizationParam,
    ) -> Result<Organization, AppError> {
        find_organization(self.db, organization_id).await?;
        require_org_role(self.db, organization_id, actor.id, OrgRole::is_manager).await?;

        param.name = param.name.trim().to_string();
        let mut errors = ValidationError::new();
        errors.check_length("name", &param.name, 1, 200);
        check_details(&mut errors, param.description.as_deref(), param.website.as_deref());
        errors.finish()?;

        Ok(OrganizationRepository::new(self.db)
            .update(organization_id, param)
            .await?)
    }

    /// Soft deletes the organization. Owners only.
    pub async fn delete(&self, actor: &User, organization_id: i32) -> Result<(), AppError> {
        find_organization(self.db, organization_id).await?;
        require_org_role(self.db, organization_id, actor.id, |role| {
            role == OrgRole::Owner
        })
        .await?;

        let txn = self.db.begin().await?;
        OrganizationRepository::new(&txn)
            .soft_delete(organization_id)
            .await?;
        AuditRepository::new(&txn)
            .record(RecordAuditParam::new(
                actor.id,
                "organization.deleted",
                entity_type::ORGANIZATION,
                organization_id,
            ))
            .await?;
        txn.commit().await?;

        Ok(())
    }

    pub async fn members(
        &self,
        organization_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Member>, AppError> {
        find_organization(self.db, organization_id).await?;

        Ok(MemberRepository::new(self.db)
            .list(organization_id, page)
            .await?)
    }

    /// Changes a member's role.
    ///
    /// Owners may assign any role. Admins may only move members between instructor and
    /// member. The last owner can never be demoted.
    ///
    /// # Returns
    /// - `Ok(())` - Role updated
    /// - `Err(AppError::Forbidden)` - The actor may not manage this member or role
    /// - `Err(AppError::NotFound)` - The target is not a member
    /// - `Err(AppError::Conflict)` - Demoting the last owner
    pub async fn change_role(
        &self,
        actor: &User,
        organization_id: i32,
        user_id: i32,
        role: OrgRole,
    ) -> Result<(), AppError> {
        find_organization(self.db, organization_id).await?;
        let actor_membership =
            require_org_role(self.db, organization_id, actor.id, OrgRole::is_manager).await?;
        let target = self.find_member(organization_id, user_id).await?;

        if !actor_membership.role.can_manage_role(target.role)
            || !actor_membership.role.can_manage_role(role)
        {
            return Err(AppError::Forbidden(
                "You cannot assign this role".to_string(),
            ));
        }

        if target.role == role {
            return Ok(());
        }

        let txn = self.db.begin().await?;
        let member_repo = MemberRepository::new(&txn);
        if target.role == OrgRole::Owner
            && member_repo.count_role(organization_id, OrgRole::Owner).await? <= 1
        {
            return Err(last_owner());
        }
        member_repo.set_role(organization_id, user_id, role).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(
                    actor.id,
                    "organization.member_role_changed",
                    entity_type::ORGANIZATION,
                    organization_id,
                )
                .details(serde_json::json!({
                    "user_id": user_id,
                    "from": target.role.as_str(),
                    "to": role.as_str(),
                })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Removes another member. Owners and admins, within the roles they manage.
    pub async fn remove_member(
        &self,
        actor: &User,
        organization_id: i32,
        user_id: i32,
    ) -> Result<(), AppError> {
        if actor.id == user_id {
            return self.leave(actor, organization_id).await;
        }

        find_organization(self.db, organization_id).await?;
        let actor_membership =
            require_org_role(self.db, organization_id, actor.id, OrgRole::is_manager).await?;
        let target = self.find_member(organization_id, user_id).await?;

        if !actor_membership.role.can_manage_role(target.role) {
            return Err(AppError::Forbidden(
                "You cannot remove this member".to_string(),
            ));
        }

        self.remove(organization_id, target, actor.id).await
    }

    /// Leaves the organization. The last owner must hand over ownership first.
    pub async fn leave(&self, actor: &User, organization_id: i32) -> Result<(), AppError> {
        find_organization(self.db, organization_id).await?;
        let membership = self.find_member(organization_id, actor.id).await?;

        self.remove(organization_id, membership, actor.id).await
    }

    pub async fn create_school(
        &self,
        actor: &User,
        organization_id: i32,
        param: UnitParam,
    ) -> Result<School, AppError> {
        find_organization(self.db, organization_id).await?;
        require_org_role(self.db, organization_id, actor.id, OrgRole::is_manager).await?;
        let param = validate_unit(param)?;

        Ok(SchoolRepository::new(self.db)
            .create(organization_id, param)
            .await?)
    }

    pub async fn update_school(
        &self,
        actor: &User,
        school_id: i32,
        param: UnitParam,
    ) -> Result<School, AppError> {
        let school = self.find_school(school_id).await?;
        require_org_role(self.db, school.organization_id, actor.id, OrgRole::is_manager).await?;
        let param = validate_unit(param)?;

        Ok(SchoolRepository::new(self.db)
            .update(school.id, param)
            .await?)
    }

    pub async fn delete_school(&self, actor: &User, school_id: i32) -> Result<(), AppError> {
        let school = self.find_school(school_id).await?;
        require_org_role(self.db, school.organization_id, actor.id, OrgRole::is_manager).await?;

        SchoolRepository::new(self.db).delete(school.id).await?;

        Ok(())
    }

    pub async fn schools(&self, organization_id: i32) -> Result<Vec<School>, AppError> {
        find_organization(self.db, organization_id).await?;

        Ok(SchoolRepository::new(self.db).list(organization_id).await?)
    }

    /// Creates a faculty under `school_id`, inheriting the school's organization.
    pub async fn create_faculty(
        &self,
        actor: &User,
        school_id: i32,
        param: UnitParam,
    ) -> Result<Faculty, AppError> {
        let school = self.find_school(school_id).await?;
        require_org_role(self.db, school.organization_id, actor.id, OrgRole::is_manager).await?;
        let param = validate_unit(param)?;

        Ok(FacultyRepository::new(self.db)
            .create(&school, param)
            .await?)
    }

    pub async fn faculties(&self, school_id: i32) -> Result<Vec<Faculty>, AppError> {
        let school = self.find_school(school_id).await?;

        Ok(FacultyRepository::new(self.db)
            .list_for_school(school.id)
            .await?)
    }

    pub async fn delete_faculty(&self, actor: &User, faculty_id: i32) -> Result<(), AppError> {
        let faculty = self.find_faculty(faculty_id).await?;
        require_org_role(self.db, faculty.organization_id, actor.id, OrgRole::is_manager).await?;

        FacultyRepository::new(self.db).delete(faculty.id).await?;

        Ok(())
    }

    /// Attaches an organization member to a faculty.
    ///
    /// # Returns
    /// - `Ok(())` - Member added
    /// - `Err(AppError::BadRequest)` - The user is not a member of the faculty's organization
    /// - `Err(AppError::Conflict)` - Already attached to this faculty
    pub async fn add_faculty_member(
        &self,
        actor: &User,
        faculty_id: i32,
        user_id: i32,
        title: Option<String>,
    ) -> Result<(), AppError> {
        let faculty = self.find_faculty(faculty_id).await?;
        require_org_role(self.db, faculty.organization_id, actor.id, OrgRole::is_manager).await?;

        if org_role(self.db, faculty.organization_id, user_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest(
                "User is not a member of this organization".to_string(),
            ));
        }

        let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let mut errors = ValidationError::new();
        errors.check_max_length("title", title.as_deref(), 100);
        errors.finish()?;

        let faculty_repo = FacultyRepository::new(self.db);
        if faculty_repo.is_member(faculty.id, user_id).await? {
            return Err(AppError::Conflict(
                "User is already a member of this faculty".to_string(),
            ));
        }

        faculty_repo.add_member(faculty.id, user_id, title).await?;

        Ok(())
    }

    pub async fn remove_faculty_member(
        &self,
        actor: &User,
        faculty_id: i32,
        user_id: i32,
    ) -> Result<(), AppError> {
        let faculty = self.find_faculty(faculty_id).await?;
        require_org_role(self.db, faculty.organization_id, actor.id, OrgRole::is_manager).await?;

        if !FacultyRepository::new(self.db)
            .remove_member(faculty.id, user_id)
            .await?
        {
            return Err(AppError::NotFound(
                "User is not a member of this faculty".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn faculty_members(&self, faculty_id: i32) -> Result<Vec<FacultyMember>, AppError> {
        let faculty = self.find_faculty(faculty_id).await?;

        Ok(FacultyRepository::new(self.db).members(faculty.id).await?)
    }

    async fn find_member(&self, organization_id: i32, user_id: i32) -> Result<Membership, AppError> {
        MemberRepository::new(self.db)
            .find(organization_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    async fn find_school(&self, school_id: i32) -> Result<School, AppError> {
        let school = SchoolRepository::new(self.db)
            .find_by_id(school_id)
            .await?
            .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;
        find_organization(self.db, school.organization_id).await?;

        Ok(school)
    }

    async fn find_faculty(&self, faculty_id: i32) -> Result<Faculty, AppError> {
        let faculty = FacultyRepository::new(self.db)
            .find_by_id(faculty_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Faculty not found".to_string()))?;
        find_organization(self.db, faculty.organization_id).await?;

        Ok(faculty)
    }

    async fn remove(
        &self,
        organization_id: i32,
        membership: Membership,
        actor_id: i32,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let member_repo = MemberRepository::new(&txn);

        if membership.role == OrgRole::Owner
            && member_repo.count_role(organization_id, OrgRole::Owner).await? <= 1
        {
            return Err(last_owner());
        }

        member_repo
            .remove(organization_id, membership.user_id)
            .await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(
                    actor_id,
                    "organization.member_removed",
                    entity_type::ORGANIZATION,
                    organization_id,
                )
                .details(serde_json::json!({ "user_id": membership.user_id })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }
}

fn check_details(errors: &mut ValidationError, description: Option<&str>, website: Option<&str>) {
    errors.check_max_length("description", description, 2000);
    if let Some(website) = website {
        errors.check_max_length("website", Some(website), 2048);
        errors.check(
            "website",
            url::Url::parse(website).is_ok(),
            "must be an absolute URL",
        );
    }
}

fn validate_unit(param: UnitParam) -> Result<UnitParam, ValidationError> {
    let param = UnitParam {
        name: param.name.trim().to_string(),
        description: param
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    };

    let mut errors = ValidationError::new();
    errors.check_length("name", &param.name, 1, 200);
    errors.check_max_length("description", param.description.as_deref(), 2000);
    errors.finish()?;

    Ok(param)
}

fn last_owner() -> AppError {
    AppError::Conflict("The last owner cannot leave or be demoted".to_string())
}
