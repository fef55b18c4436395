//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the repositories. They enforce access rules
//! and state transitions, and open a transaction whenever one operation writes more than
//! one row that must change together. Repositories inside a transaction are built on the
//! `DatabaseTransaction`, never on the pool.

pub mod admin;
pub mod audit;
pub mod auth;
pub mod club;
pub mod course;
pub mod follow;
pub mod invitation;
pub mod job;
pub mod mail;
pub mod notification;
pub mod organization;
pub mod post;
pub mod research;
pub mod user;

#[cfg(test)]
mod test;
