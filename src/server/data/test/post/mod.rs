use crate::server::{
    data::post::{CommentRepository, LikeRepository, PostRepository},
    model::{CursorRequest, PageRequest},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory, factory::post::PostFactory};

mod by_authors;
mod comment;
mod like;
mod soft_delete;
