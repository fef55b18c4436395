//! Factories for courses, approvals and enrollments.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test courses.
///
/// ```rust,ignore
/// let course = CourseFactory::new(&db, org.id, instructor.id)
///     .status("published")
///     .build()
///     .await?;
/// ```
pub struct CourseFactory<'a> {
    db: &'a DatabaseConnection,
    organization_id: i32,
    created_by: i32,
    faculty_id: Option<i32>,
    title: String,
    code: String,
    status: String,
    deleted: bool,
}

impl<'a> CourseFactory<'a> {
    /// Defaults: title `"Course {id}"`, code `"C{id}"`, status `draft`.
    pub fn new(db: &'a DatabaseConnection, organization_id: i32, created_by: i32) -> Self {
        let id = next_id();
        Self {
            db,
            organization_id,
            created_by,
            faculty_id: None,
            title: format!("Course {}", id),
            code: format!("C{}", id),
            status: "draft".to_string(),
            deleted: false,
        }
    }

    pub fn faculty_id(mut self, faculty_id: i32) -> Self {
        self.faculty_id = Some(faculty_id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    pub async fn build(self) -> Result<entity::course::Model, DbErr> {
        let now = Utc::now();
        entity::course::ActiveModel {
            organization_id: ActiveValue::Set(self.organization_id),
            faculty_id: ActiveValue::Set(self.faculty_id),
            created_by: ActiveValue::Set(self.created_by),
            title: ActiveValue::Set(self.title),
            code: ActiveValue::Set(self.code),
            description: ActiveValue::Set(None),
            credits: ActiveValue::Set(Some(3)),
            status: ActiveValue::Set(self.status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(self.deleted.then_some(now)),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a draft course.
pub async fn create_course(
    db: &DatabaseConnection,
    organization_id: i32,
    created_by: i32,
) -> Result<entity::course::Model, DbErr> {
    CourseFactory::new(db, organization_id, created_by).build().await
}

/// Creates a course approval row with the given status.
pub async fn create_approval(
    db: &DatabaseConnection,
    course_id: i32,
    submitted_by: i32,
    reviewer_id: Option<i32>,
    status: &str,
) -> Result<entity::course_approval::Model, DbErr> {
    entity::course_approval::ActiveModel {
        course_id: ActiveValue::Set(course_id),
        submitted_by: ActiveValue::Set(submitted_by),
        reviewer_id: ActiveValue::Set(reviewer_id),
        status: ActiveValue::Set(status.to_string()),
        feedback: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
        reviewed_at: ActiveValue::Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Enrolls the user in the course.
pub async fn create_enrollment(
    db: &DatabaseConnection,
    course_id: i32,
    user_id: i32,
) -> Result<entity::enrollment::Model, DbErr> {
    entity::enrollment::ActiveModel {
        course_id: ActiveValue::Set(course_id),
        user_id: ActiveValue::Set(user_id),
        enrolled_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
