use crate::server::{
    data::job::{ApplicationRepository, JobRepository},
    model::{
        job::{ApplicationStatus, ApplyParam, EmploymentType, JobParam, JobStatus},
        PageRequest,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::job::JobFactory};

mod application;
mod posting;
