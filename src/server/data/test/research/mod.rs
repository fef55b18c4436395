use crate::server::{
    data::research::ResearchRepository,
    model::{
        research::{CollaboratorStatus, ResearchParam, ResearchStatus},
        PageRequest,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod collaboration;
mod project;
