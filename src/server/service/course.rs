//! Courses and the approval workflow that publishes them.
//!
//! ```text
//! DRAFT ──submit──▶ UNDER_REVIEW ──approve──────────▶ PUBLISHED
//!                        │ ────reject────────────▶ REJECTED
//!                        └────request_changes───▶ NEEDS_REVISION ──submit──▶ UNDER_REVIEW
//! ```
//!
//! Submission and review each write the course status, the approval row, a notification
//! and an audit entry in one transaction.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        audit::AuditRepository,
        course::{ApprovalRepository, CourseRepository, EnrollmentRepository},
        notification::NotificationRepository,
        organization::{FacultyRepository, MemberRepository},
    },
    error::{validation::ValidationError, AppError},
    model::{
        audit::{entity_type, RecordAuditParam},
        course::{
            ApprovalStatus, Course, CourseApproval, CourseStatus, CreateCourseParam, Enrollment,
            ReviewDecision, UpdateCourseParam,
        },
        notification::{CreateNotificationParam, NotificationKind},
        organization::OrgRole,
        user::User,
        PageRequest, Paginated,
    },
    service::organization::{find_organization, org_role, require_org_role},
    util::parse::StoredEnum,
};

/// Course fields as submitted by the client, shared by create and update.
#[derive(Debug, Clone)]
pub struct CourseForm {
    pub faculty_id: Option<i32>,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: Option<i32>,
}

impl CourseForm {
    fn normalized(self) -> Self {
        Self {
            faculty_id: self.faculty_id,
            title: self.title.trim().to_string(),
            code: self.code.trim().to_uppercase(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            credits: self.credits,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        errors.check_length("title", &self.title, 1, 200);
        errors.check_length("code", &self.code, 1, 32);
        errors.check_max_length("description", self.description.as_deref(), 5000);
        if let Some(credits) = self.credits {
            errors.check("credits", (0..=60).contains(&credits), "must be between 0 and 60");
        }
        errors.finish()
    }
}

pub struct CourseService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> CourseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft course. Owners, admins and instructors only.
    ///
    /// # Returns
    /// - `Ok(Course)` - The new course in `draft`
    /// - `Err(AppError::Forbidden)` - Actor is not staff of the organization
    /// - `Err(AppError::Validation)` - Title, code, description or credits invalid
    /// - `Err(AppError::BadRequest)` - The faculty belongs to another organization
    pub async fn create(
        &self,
        actor: &User,
        organization_id: i32,
        form: CourseForm,
    ) -> Result<Course, AppError> {
        find_organization(self.db, organization_id).await?;
        require_org_role(self.db, organization_id, actor.id, OrgRole::is_staff).await?;

        let form = form.normalized();
        form.validate()?;
        self.check_faculty(organization_id, form.faculty_id).await?;

        let course = CourseRepository::new(self.db)
            .create(CreateCourseParam {
                organization_id,
                faculty_id: form.faculty_id,
                created_by: actor.id,
                title: form.title,
                code: form.code,
                description: form.description,
                credits: form.credits,
            })
            .await?;

        Ok(course)
    }

    /// Edits a course while its author holds it (`draft` or `needs_revision`).
    pub async fn update(
        &self,
        actor: &User,
        course_id: i32,
        form: CourseForm,
    ) -> Result<Course, AppError> {
        let course = self.find(course_id).await?;
        self.ensure_can_manage(actor, &course).await?;

        if !course.status.is_editable() {
            return Err(AppError::Conflict(format!(
                "A {} course cannot be edited",
                course.status.as_str()
            )));
        }

        let form = form.normalized();
        form.validate()?;
        self.check_faculty(course.organization_id, form.faculty_id)
            .await?;

        Ok(CourseRepository::new(self.db)
            .update(
                course.id,
                UpdateCourseParam {
                    faculty_id: form.faculty_id,
                    title: form.title,
                    code: form.code,
                    description: form.description,
                    credits: form.credits,
                },
            )
            .await?)
    }

    /// Sends a course for review.
    ///
    /// The reviewer is the earliest joined admin of the organization, falling back to
    /// the earliest joined owner. The submitter never reviews their own course.
    ///
    /// # Returns
    /// - `Ok(CourseApproval)` - The pending approval assigned to the reviewer
    /// - `Err(AppError::Conflict)` - The course is not in a submittable state, or the
    ///   organization has nobody else who could review it
    pub async fn submit(&self, actor: &User, course_id: i32) -> Result<CourseApproval, AppError> {
        let course = self.find(course_id).await?;
        self.ensure_can_manage(actor, &course).await?;

        if !course.status.can_submit() {
            return Err(AppError::Conflict(format!(
                "A {} course cannot be submitted for review",
                course.status.as_str()
            )));
        }

        let reviewer_id = MemberRepository::new(self.db)
            .first_reviewer(course.organization_id, actor.id)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("No reviewer is available in this organization".to_string())
            })?;

        let txn = self.db.begin().await?;
        if !CourseRepository::new(&txn)
            .transition(
                course.id,
                CourseStatus::SUBMITTABLE,
                CourseStatus::UnderReview,
            )
            .await?
        {
            return Err(AppError::Conflict(
                "The course was submitted or changed in the meantime".to_string(),
            ));
        }
        let approval = ApprovalRepository::new(&txn)
            .create(course.id, actor.id, reviewer_id)
            .await?;
        NotificationRepository::new(&txn)
            .create(
                CreateNotificationParam::new(
                    reviewer_id,
                    actor.id,
                    NotificationKind::CourseReviewRequested,
                    format!("{} submitted {} for review", actor.name, course.code),
                )
                .link(format!("/courses/{}", course.id)),
            )
            .await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(actor.id, "course.submitted", entity_type::COURSE, course.id)
                    .details(serde_json::json!({
                        "approval_id": approval.id,
                        "reviewer_id": reviewer_id,
                    })),
            )
            .await?;
        txn.commit().await?;

        tracing::debug!(
            "Course {} submitted by {}, reviewer {}",
            course.id,
            actor.id,
            reviewer_id
        );

        Ok(approval)
    }

    /// Records the reviewer's decision and moves the course accordingly.
    ///
    /// # Arguments
    /// - `actor` - Assigned reviewer, or an owner/admin of the organization other than
    ///   the submitter
    /// - `approval_id` - The pending approval
    /// - `decision` - Approve, reject or request changes
    /// - `feedback` - Required when requesting changes
    ///
    /// # Returns
    /// - `Ok(CourseApproval)` - The completed approval
    /// - `Err(AppError::Forbidden)` - Actor may not review this course
    /// - `Err(AppError::BadRequest)` - Changes requested without feedback
    /// - `Err(AppError::Conflict)` - The approval was already reviewed, or the course
    ///   left review in the meantime
    pub async fn review(
        &self,
        actor: &User,
        approval_id: i32,
        decision: ReviewDecision,
        feedback: Option<String>,
    ) -> Result<CourseApproval, AppError> {
        let approval = self.find_approval(approval_id).await?;
        let course = self.find(approval.course_id).await?;

        let is_assigned = approval.reviewer_id == Some(actor.id);
        let is_manager = org_role(self.db, course.organization_id, actor.id)
            .await?
            .is_some_and(OrgRole::is_manager);
        if !is_assigned && !is_manager {
            return Err(AppError::Forbidden(
                "You are not a reviewer for this course".to_string(),
            ));
        }
        if approval.submitted_by == actor.id {
            return Err(AppError::Forbidden(
                "You cannot review a course you submitted".to_string(),
            ));
        }

        if approval.status != ApprovalStatus::Pending {
            return Err(already_reviewed());
        }

        let feedback = feedback
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        if decision.requires_feedback() && feedback.is_none() {
            return Err(AppError::BadRequest(
                "Feedback is required when requesting changes".to_string(),
            ));
        }
        let mut errors = ValidationError::new();
        errors.check_max_length("feedback", feedback.as_deref(), 5000);
        errors.finish()?;

        let txn = self.db.begin().await?;
        if !ApprovalRepository::new(&txn)
            .complete(
                approval.id,
                actor.id,
                decision.approval_status(),
                feedback.clone(),
            )
            .await?
        {
            return Err(already_reviewed());
        }
        if !CourseRepository::new(&txn)
            .transition(
                course.id,
                &[CourseStatus::UnderReview],
                decision.course_status(),
            )
            .await?
        {
            return Err(AppError::Conflict(
                "The course is no longer under review".to_string(),
            ));
        }
        NotificationRepository::new(&txn)
            .create(
                CreateNotificationParam::new(
                    approval.submitted_by,
                    actor.id,
                    NotificationKind::CourseReviewed,
                    format!(
                        "{} was reviewed: {}",
                        course.code,
                        decision.approval_status().as_str()
                    ),
                )
                .link(format!("/courses/{}", course.id)),
            )
            .await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(
                    actor.id,
                    "course.reviewed",
                    entity_type::COURSE_APPROVAL,
                    approval.id,
                )
                .details(serde_json::json!({
                    "course_id": course.id,
                    "decision": decision.as_str(),
                    "feedback": feedback,
                })),
            )
            .await?;
        txn.commit().await?;

        self.find_approval(approval.id).await
    }

    /// Pending approvals assigned to the actor.
    pub async fn review_queue(
        &self,
        actor: &User,
        page: PageRequest,
    ) -> Result<Paginated<CourseApproval>, AppError> {
        Ok(ApprovalRepository::new(self.db)
            .queue_for_reviewer(actor.id, page)
            .await?)
    }

    /// Every approval round of a course, newest first. Creator and org staff only.
    pub async fn approval_history(
        &self,
        actor: &User,
        course_id: i32,
    ) -> Result<Vec<CourseApproval>, AppError> {
        let course = self.find(course_id).await?;
        self.ensure_staff_or_creator(actor, &course).await?;

        Ok(ApprovalRepository::new(self.db).history(course.id).await?)
    }

    /// Courses of an organization. Staff see every status, everyone else only published.
    pub async fn list_for_organization(
        &self,
        viewer: &User,
        organization_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Course>, AppError> {
        find_organization(self.db, organization_id).await?;

        let is_staff = org_role(self.db, organization_id, viewer.id)
            .await?
            .is_some_and(OrgRole::is_staff);

        Ok(CourseRepository::new(self.db)
            .list_for_organization(organization_id, !is_staff, page)
            .await?)
    }

    /// A single course. Unpublished courses read as missing to outsiders.
    pub async fn get(&self, viewer: &User, course_id: i32) -> Result<Course, AppError> {
        let course = self.find(course_id).await?;

        if course.status == CourseStatus::Published {
            return Ok(course);
        }

        match self.ensure_staff_or_creator(viewer, &course).await {
            Ok(()) => Ok(course),
            Err(AppError::Forbidden(_)) => Err(course_not_found()),
            Err(e) => Err(e),
        }
    }

    /// Soft deletes a course. Creator or org owner/admin.
    pub async fn delete(&self, actor: &User, course_id: i32) -> Result<(), AppError> {
        let course = self.find(course_id).await?;
        self.ensure_can_manage(actor, &course).await?;

        let txn = self.db.begin().await?;
        CourseRepository::new(&txn).soft_delete(course.id).await?;
        AuditRepository::new(&txn)
            .record(
                RecordAuditParam::new(actor.id, "course.deleted", entity_type::COURSE, course.id)
                    .details(serde_json::json!({ "code": course.code })),
            )
            .await?;
        txn.commit().await?;

        Ok(())
    }

    /// Enrolls the actor in a published course.
    pub async fn enroll(&self, actor: &User, course_id: i32) -> Result<(), AppError> {
        let course = self.find(course_id).await?;
        if course.status != CourseStatus::Published {
            return Err(AppError::Conflict(
                "Only published courses accept enrollments".to_string(),
            ));
        }

        let enrollment_repo = EnrollmentRepository::new(self.db);
        if enrollment_repo.exists(course.id, actor.id).await? {
            return Err(AppError::Conflict(
                "You are already enrolled in this course".to_string(),
            ));
        }

        enrollment_repo.create(course.id, actor.id).await?;

        Ok(())
    }

    pub async fn unenroll(&self, actor: &User, course_id: i32) -> Result<(), AppError> {
        let course = self.find(course_id).await?;

        if !EnrollmentRepository::new(self.db)
            .delete(course.id, actor.id)
            .await?
        {
            return Err(AppError::NotFound(
                "You are not enrolled in this course".to_string(),
            ));
        }

        Ok(())
    }

    /// Enrolled users of a course. Creator and org staff only.
    pub async fn enrollments(
        &self,
        actor: &User,
        course_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Enrollment>, AppError> {
        let course = self.find(course_id).await?;
        self.ensure_staff_or_creator(actor, &course).await?;

        Ok(EnrollmentRepository::new(self.db)
            .list_for_course(course.id, page)
            .await?)
    }

    /// Courses the actor is enrolled in.
    pub async fn my_enrollments(
        &self,
        actor: &User,
        page: PageRequest,
    ) -> Result<Paginated<Course>, AppError> {
        Ok(EnrollmentRepository::new(self.db)
            .courses_for_user(actor.id, page)
            .await?)
    }

    async fn find(&self, course_id: i32) -> Result<Course, AppError> {
        CourseRepository::new(self.db)
            .find_by_id(course_id)
            .await?
            .ok_or_else(course_not_found)
    }

    async fn find_approval(&self, approval_id: i32) -> Result<CourseApproval, AppError> {
        ApprovalRepository::new(self.db)
            .find_by_id(approval_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Approval not found".to_string()))
    }

    /// Creator, or owner/admin of the course's organization.
    async fn ensure_can_manage(&self, actor: &User, course: &Course) -> Result<(), AppError> {
        if course.created_by == actor.id {
            return Ok(());
        }

        require_org_role(self.db, course.organization_id, actor.id, OrgRole::is_manager).await?;

        Ok(())
    }

    /// Creator, or owner/admin/instructor of the course's organization.
    async fn ensure_staff_or_creator(&self, actor: &User, course: &Course) -> Result<(), AppError> {
        if course.created_by == actor.id {
            return Ok(());
        }

        require_org_role(self.db, course.organization_id, actor.id, OrgRole::is_staff).await?;

        Ok(())
    }

    async fn check_faculty(
        &self,
        organization_id: i32,
        faculty_id: Option<i32>,
    ) -> Result<(), AppError> {
        let Some(faculty_id) = faculty_id else {
            return Ok(());
        };

        let faculty = FacultyRepository::new(self.db)
            .find_by_id(faculty_id)
            .await?;

        match faculty {
            Some(faculty) if faculty.organization_id == organization_id => Ok(()),
            _ => Err(AppError::BadRequest(
                "Faculty does not belong to this organization".to_string(),
            )),
        }
    }
}

fn course_not_found() -> AppError {
    AppError::NotFound("Course not found".to_string())
}

fn already_reviewed() -> AppError {
    AppError::Conflict("This approval has already been reviewed".to_string())
}
