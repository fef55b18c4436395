//! Request and response DTOs exchanged over the JSON API.

pub mod api;
pub mod audit;
pub mod club;
pub mod course;
pub mod follow;
pub mod invitation;
pub mod job;
pub mod notification;
pub mod organization;
pub mod post;
pub mod research;
pub mod user;
