//! `SeaORM` Entity prelude

pub use super::audit_log::Entity as AuditLog;
pub use super::club::Entity as Club;
pub use super::club_member::Entity as ClubMember;
pub use super::comment::Entity as Comment;
pub use super::course::Entity as Course;
pub use super::course_approval::Entity as CourseApproval;
pub use super::enrollment::Entity as Enrollment;
pub use super::event::Entity as Event;
pub use super::event_attendee::Entity as EventAttendee;
pub use super::faculty::Entity as Faculty;
pub use super::faculty_member::Entity as FacultyMember;
pub use super::follow::Entity as Follow;
pub use super::follow_request::Entity as FollowRequest;
pub use super::invitation::Entity as Invitation;
pub use super::job::Entity as Job;
pub use super::job_application::Entity as JobApplication;
pub use super::notification::Entity as Notification;
pub use super::organization::Entity as Organization;
pub use super::organization_member::Entity as OrganizationMember;
pub use super::post::Entity as Post;
pub use super::post_like::Entity as PostLike;
pub use super::research::Entity as Research;
pub use super::research_collaborator::Entity as ResearchCollaborator;
pub use super::school::Entity as School;
pub use super::user::Entity as User;
