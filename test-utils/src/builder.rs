use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityName, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Add entity tables individually or through the grouped helpers, then call
/// `build()` to create the configured test context. Adding the same table twice is a
/// no-op, so grouped helpers can overlap freely.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{User, Post};
///
/// let test = TestBuilder::new()
///     .with_table(User)
///     .with_table(Post)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements keyed by table name, executed in insertion order.
    tables: Vec<(String, TableCreateStatement)>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables referenced by foreign keys should be added before the
    /// tables that reference them so factories can insert parent rows first.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let name = entity.table_name().to_string();
        if self.tables.iter().any(|(existing, _)| *existing == name) {
            return self;
        }

        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push((name, schema.create_table_from_entity(entity)));
        self
    }

    /// Adds the tables behind profiles, posts, follows and notifications.
    ///
    /// - User, Post, Comment, PostLike
    /// - Follow, FollowRequest
    /// - Notification, AuditLog
    pub fn with_social_tables(self) -> Self {
        self.with_table(User)
            .with_table(Post)
            .with_table(Comment)
            .with_table(PostLike)
            .with_table(Follow)
            .with_table(FollowRequest)
            .with_table(Notification)
            .with_table(AuditLog)
    }

    /// Adds the organization hierarchy tables including invitations.
    ///
    /// - User, Organization, OrganizationMember
    /// - School, Faculty, FacultyMember
    /// - Invitation, Notification, AuditLog
    pub fn with_organization_tables(self) -> Self {
        self.with_table(User)
            .with_table(Organization)
            .with_table(OrganizationMember)
            .with_table(School)
            .with_table(Faculty)
            .with_table(FacultyMember)
            .with_table(Invitation)
            .with_table(Notification)
            .with_table(AuditLog)
    }

    /// Adds the course workflow tables on top of the organization tables.
    pub fn with_course_tables(self) -> Self {
        self.with_organization_tables()
            .with_table(Course)
            .with_table(CourseApproval)
            .with_table(Enrollment)
    }

    /// Adds job postings and applications on top of the organization tables.
    pub fn with_job_tables(self) -> Self {
        self.with_organization_tables()
            .with_table(Job)
            .with_table(JobApplication)
    }

    /// Adds research projects and collaborators on top of the organization tables.
    pub fn with_research_tables(self) -> Self {
        self.with_organization_tables()
            .with_table(Research)
            .with_table(ResearchCollaborator)
    }

    /// Adds clubs, events and their membership tables on top of the organization tables.
    pub fn with_club_tables(self) -> Self {
        self.with_organization_tables()
            .with_table(Club)
            .with_table(ClubMember)
            .with_table(Event)
            .with_table(EventAttendee)
    }

    /// Adds every table of the schema.
    pub fn with_all_tables(self) -> Self {
        self.with_social_tables()
            .with_course_tables()
            .with_job_tables()
            .with_research_tables()
            .with_club_tables()
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// Creates an in-memory SQLite database connection and executes all CREATE TABLE
    /// statements in the order they were added.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized test context with tables ready
    /// - `Err(TestError::Database)` - Failed to connect or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup
            .with_tables(self.tables.into_iter().map(|(_, stmt)| stmt).collect())
            .await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
