use crate::server::{
    data::club::{ClubRepository, EventRepository},
    model::{
        club::{ClubRole, CreateClubParam, CreateEventParam},
        PageRequest,
    },
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::club::EventFactory};

mod event;
mod membership;
