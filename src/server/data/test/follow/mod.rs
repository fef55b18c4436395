use crate::server::{
    data::follow::{FollowRepository, FollowRequestRepository},
    model::{follow::FollowRequestStatus, PageRequest},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod counts;
mod create;
mod delete;
mod followers;
mod request_lists;
mod set_status;
