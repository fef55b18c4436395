use crate::server::{
    data::notification::NotificationRepository,
    model::{
        notification::{CreateNotificationParam, NotificationKind},
        PageRequest,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod mark_read;
