//! HTTP handlers. Each handler authenticates the caller, maps DTOs to params, calls one
//! service and maps the result back to a DTO.

pub mod audit;
pub mod auth;
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
