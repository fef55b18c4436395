use crate::server::{
    data::course::{ApprovalRepository, CourseRepository, EnrollmentRepository},
    model::{
        course::{ApprovalStatus, CourseStatus, CreateCourseParam, UpdateCourseParam},
        PageRequest,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::course::CourseFactory};

mod approval;
mod create;
mod enrollment;
mod list;
mod soft_delete;
