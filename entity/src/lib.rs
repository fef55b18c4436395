//! `SeaORM` entities for every table created by the `migration` crate.

pub mod prelude;

pub mod audit_log;
pub mod club;
pub mod club_member;
pub mod comment;
pub mod course;
pub mod course_approval;
pub mod enrollment;
pub mod event;
pub mod event_attendee;
pub mod faculty;
pub mod faculty_member;
pub mod follow;
pub mod follow_request;
pub mod invitation;
pub mod job;
pub mod job_application;
pub mod notification;
pub mod organization;
pub mod organization_member;
pub mod post;
pub mod post_like;
pub mod research;
pub mod research_collaborator;
pub mod school;
pub mod user;
