use crate::server::{
    data::audit::AuditRepository,
    model::{
        audit::{entity_type, RecordAuditParam},
        PageRequest,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod record;
