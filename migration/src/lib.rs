pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_user_table;
mod m20260105_000002_create_organization_table;
mod m20260105_000003_create_organization_member_table;
mod m20260105_000004_create_school_table;
mod m20260105_000005_create_faculty_table;
mod m20260105_000006_create_faculty_member_table;
mod m20260105_000007_create_course_table;
mod m20260105_000008_create_course_approval_table;
mod m20260105_000009_create_enrollment_table;
mod m20260105_000010_create_post_table;
mod m20260105_000011_create_comment_table;
mod m20260105_000012_create_post_like_table;
mod m20260105_000013_create_follow_table;
mod m20260105_000014_create_follow_request_table;
mod m20260105_000015_create_invitation_table;
mod m20260105_000016_create_notification_table;
mod m20260105_000017_create_job_table;
mod m20260105_000018_create_job_application_table;
mod m20260105_000019_create_research_table;
mod m20260105_000020_create_research_collaborator_table;
mod m20260105_000021_create_club_table;
mod m20260105_000022_create_club_member_table;
mod m20260105_000023_create_event_table;
mod m20260105_000024_create_event_attendee_table;
mod m20260105_000025_create_audit_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_user_table::Migration),
            Box::new(m20260105_000002_create_organization_table::Migration),
            Box::new(m20260105_000003_create_organization_member_table::Migration),
            Box::new(m20260105_000004_create_school_table::Migration),
            Box::new(m20260105_000005_create_faculty_table::Migration),
            Box::new(m20260105_000006_create_faculty_member_table::Migration),
            Box::new(m20260105_000007_create_course_table::Migration),
            Box::new(m20260105_000008_create_course_approval_table::Migration),
            Box::new(m20260105_000009_create_enrollment_table::Migration),
            Box::new(m20260105_000010_create_post_table::Migration),
            Box::new(m20260105_000011_create_comment_table::Migration),
            Box::new(m20260105_000012_create_post_like_table::Migration),
            Box::new(m20260105_000013_create_follow_table::Migration),
            Box::new(m20260105_000014_create_follow_request_table::Migration),
            Box::new(m20260105_000015_create_invitation_table::Migration),
            Box::new(m20260105_000016_create_notification_table::Migration),
            Box::new(m20260105_000017_create_job_table::Migration),
            Box::new(m20260105_000018_create_job_application_table::Migration),
            Box::new(m20260105_000019_create_research_table::Migration),
            Box::new(m20260105_000020_create_research_collaborator_table::Migration),
            Box::new(m20260105_000021_create_club_table::Migration),
            Box::new(m20260105_000022_create_club_member_table::Migration),
            Box::new(m20260105_000023_create_event_table::Migration),
            Box::new(m20260105_000024_create_event_attendee_table::Migration),
            Box::new(m20260105_000025_create_audit_log_table::Migration),
        ]
    }
}
