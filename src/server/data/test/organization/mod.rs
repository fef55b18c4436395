use crate::server::{
    data::organization::{
        FacultyRepository, MemberRepository, OrganizationRepository, SchoolRepository,
    },
    model::{
        organization::{CreateOrganizationParam, OrgRole, UnitParam, UpdateOrganizationParam},
        PageRequest,
    },
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod faculty;
mod first_reviewer;
mod members;
mod soft_delete;
