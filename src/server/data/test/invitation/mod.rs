use crate::server::{
    data::invitation::InvitationRepository,
    model::{
        invitation::{CreateInvitationParam, InvitationStatus},
        organization::OrgRole,
        PageRequest,
    },
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::invitation::InvitationFactory};

mod create;
mod expire_overdue;
mod list;
mod transition;
