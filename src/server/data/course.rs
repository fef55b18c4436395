//! Courses, course approvals and enrollments.

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Query},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    data::{active_user_ids, fetch_page, users_by_id},
    model::{
        course::{
            ApprovalStatus, Course, CourseApproval, CourseStatus, CreateCourseParam, Enrollment,
            UpdateCourseParam,
        },
        PageRequest, Paginated,
    },
    util::parse::StoredEnum,
};

pub struct CourseRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a course in draft.
    pub async fn create(&self, param: CreateCourseParam) -> Result<Course, DbErr> {
        let now = Utc::now();

        let entity = entity::course::ActiveModel {
            organization_id: ActiveValue::Set(param.organization_id),
            faculty_id: ActiveValue::Set(param.faculty_id),
            created_by: ActiveValue::Set(param.created_by),
            title: ActiveValue::Set(param.title),
            code: ActiveValue::Set(param.code),
            description: ActiveValue::Set(param.description),
            credits: ActiveValue::Set(param.credits),
            status: ActiveValue::Set(CourseStatus::Draft.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Course::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Course>, DbErr> {
        entity::prelude::Course::find_by_id(id)
            .filter(entity::course::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .map(Course::from_entity)
            .transpose()
    }

    pub async fn update(&self, id: i32, param: UpdateCourseParam) -> Result<Course, DbErr> {
        let entity = entity::prelude::Course::find_by_id(id)
            .filter(entity::course::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("course {}", id)))?;

        let mut active: entity::course::ActiveModel = entity.into();
        active.faculty_id = ActiveValue::Set(param.faculty_id);
        active.title = ActiveValue::Set(param.title);
        active.code = ActiveValue::Set(param.code);
        active.description = ActiveValue::Set(param.description);
        active.credits = ActiveValue::Set(param.credits);
        active.updated_at = ActiveValue::Set(Utc::now());

        Course::from_entity(active.update(self.db).await?)
    }

    /// Moves a live course to `to` if it currently holds one of `from`.
    ///
    /// # Returns
    /// - `Ok(true)` - The course was in one of `from` and now holds `to`
    /// - `Ok(false)` - The course is missing, deleted, or was moved by someone else
    pub async fn transition(
        &self,
        id: i32,
        from: &[CourseStatus],
        to: CourseStatus,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Course::update_many()
            .col_expr(entity::course::Column::Status, Expr::value(to.as_str()))
            .col_expr(entity::course::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::course::Column::Id.eq(id))
            .filter(entity::course::Column::Status.is_in(from.iter().map(|s| s.as_str())))
            .filter(entity::course::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Courses of an organization ordered by code.
    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        published_only: bool,
        page: PageRequest,
    ) -> Result<Paginated<Course>, DbErr> {
        let mut select = entity::prelude::Course::find()
            .filter(entity::course::Column::OrganizationId.eq(organization_id))
            .filter(entity::course::Column::DeletedAt.is_null());

        if published_only {
            select = select
                .filter(entity::course::Column::Status.eq(CourseStatus::Published.as_str()));
        }

        let select = select
            .order_by_asc(entity::course::Column::Code)
            .order_by_asc(entity::course::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(Course::from_entity)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Course::update_many()
            .col_expr(entity::course::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(entity::course::Column::Id.eq(id))
            .filter(entity::course::Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Clears `deleted_at`. Returns false when the course is missing or not deleted.
    pub async fn restore(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Course::update_many()
            .col_expr(
                entity::course::Column::DeletedAt,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .filter(entity::course::Column::Id.eq(id))
            .filter(entity::course::Column::DeletedAt.is_not_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

pub struct ApprovalRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ApprovalRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Opens a pending approval for a submitted course.
    pub async fn create(
        &self,
        course_id: i32,
        submitted_by: i32,
        reviewer_id: i32,
    ) -> Result<CourseApproval, DbErr> {
        let entity = entity::course_approval::ActiveModel {
            course_id: ActiveValue::Set(course_id),
            submitted_by: ActiveValue::Set(submitted_by),
            reviewer_id: ActiveValue::Set(Some(reviewer_id)),
            status: ActiveValue::Set(ApprovalStatus::Pending.as_str().to_string()),
            feedback: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            reviewed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        CourseApproval::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<CourseApproval>, DbErr> {
        entity::prelude::CourseApproval::find_by_id(id)
            .one(self.db)
            .await?
            .map(CourseApproval::from_entity)
            .transpose()
    }

    /// Records a review decision on a pending approval.
    ///
    /// # Returns
    /// - `Ok(true)` - The approval was pending and now carries the decision
    /// - `Ok(false)` - The approval is missing or was already reviewed
    pub async fn complete(
        &self,
        id: i32,
        reviewer_id: i32,
        status: ApprovalStatus,
        feedback: Option<String>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::CourseApproval::update_many()
            .col_expr(
                entity::course_approval::Column::Status,
                Expr::value(status.as_str()),
            )
            .col_expr(
                entity::course_approval::Column::ReviewerId,
                Expr::value(reviewer_id),
            )
            .col_expr(entity::course_approval::Column::Feedback, Expr::value(feedback))
            .col_expr(
                entity::course_approval::Column::ReviewedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::course_approval::Column::Id.eq(id))
            .filter(
                entity::course_approval::Column::Status.eq(ApprovalStatus::Pending.as_str()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Pending approvals assigned to `reviewer_id` for courses that still exist, oldest first.
    pub async fn queue_for_reviewer(
        &self,
        reviewer_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<CourseApproval>, DbErr> {
        let select = entity::prelude::CourseApproval::find()
            .filter(entity::course_approval::Column::ReviewerId.eq(reviewer_id))
            .filter(
                entity::course_approval::Column::Status.eq(ApprovalStatus::Pending.as_str()),
            )
            .filter(
                entity::course_approval::Column::CourseId.in_subquery(
                    Query::select()
                        .column(entity::course::Column::Id)
                        .from(entity::course::Entity)
                        .and_where(entity::course::Column::DeletedAt.is_null())
                        .to_owned(),
                ),
            )
            .order_by_asc(entity::course_approval::Column::CreatedAt)
            .order_by_asc(entity::course_approval::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(CourseApproval::from_entity)
    }

    /// Every approval of a course, newest first.
    pub async fn history(&self, course_id: i32) -> Result<Vec<CourseApproval>, DbErr> {
        entity::prelude::CourseApproval::find()
            .filter(entity::course_approval::Column::CourseId.eq(course_id))
            .order_by_desc(entity::course_approval::Column::CreatedAt)
            .order_by_desc(entity::course_approval::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(CourseApproval::from_entity)
            .collect()
    }
}

pub struct EnrollmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EnrollmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn exists(&self, course_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let row = entity::prelude::Enrollment::find_by_id((course_id, user_id))
            .one(self.db)
            .await?;

        Ok(row.is_some())
    }

    pub async fn create(&self, course_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::enrollment::ActiveModel {
            course_id: ActiveValue::Set(course_id),
            user_id: ActiveValue::Set(user_id),
            enrolled_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, course_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Enrollment::delete_by_id((course_id, user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Enrolled students of a course, earliest enrollment first.
    pub async fn list_for_course(
        &self,
        course_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Enrollment>, DbErr> {
        let select = entity::prelude::Enrollment::find()
            .filter(entity::enrollment::Column::CourseId.eq(course_id))
            .filter(entity::enrollment::Column::UserId.in_subquery(active_user_ids()))
            .order_by_asc(entity::enrollment::Column::EnrolledAt)
            .order_by_asc(entity::enrollment::Column::UserId);

        let rows = fetch_page(self.db, select, page).await?;
        let mut users = users_by_id(self.db, rows.items.iter().map(|row| row.user_id)).await?;

        let items = rows
            .items
            .iter()
            .filter_map(|row| {
                users.remove(&row.user_id).map(|user| Enrollment {
                    course_id: row.course_id,
                    user,
                    enrolled_at: row.enrolled_at,
                })
            })
            .collect();

        Ok(rows.with_items(items))
    }

    /// Courses `user_id` is enrolled in, ordered by code.
    pub async fn courses_for_user(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Course>, DbErr> {
        let select = entity::prelude::Course::find()
            .filter(entity::course::Column::DeletedAt.is_null())
            .filter(
                entity::course::Column::Id.in_subquery(
                    Query::select()
                        .column(entity::enrollment::Column::CourseId)
                        .from(entity::enrollment::Entity)
                        .and_where(entity::enrollment::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(entity::course::Column::Code)
            .order_by_asc(entity::course::Column::Id);

        fetch_page(self.db, select, page)
            .await?
            .try_map(Course::from_entity)
    }
}
