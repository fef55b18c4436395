use crate::server::{
    data::user::UserRepository,
    model::{
        user::{UpdateProfileParam, UpsertUserParam},
        PageRequest,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod admin_exists;
mod find_by_id;
mod search;
mod update_profile;
mod upsert;
