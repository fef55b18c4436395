//! Factory methods for creating test data.
//!
//! Each entity has a factory module with a `*Factory` builder for customization and
//! `create_*` shorthands for the common case. Factories never create parent rows
//! implicitly; pass the ids of rows created beforehand, or use `helpers` for the
//! usual dependency chains.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let owner = factory::user::create_user(db).await?;
//! let org = factory::organization::create_organization(db, owner.id).await?;
//! factory::organization::create_member(db, org.id, owner.id, "owner").await?;
//!
//! let private = factory::user::UserFactory::new(db).private(true).build().await?;
//! ```

pub mod club;
pub mod course;
pub mod follow;
pub mod helpers;
pub mod invitation;
pub mod job;
pub mod notification;
pub mod organization;
pub mod post;
pub mod research;
pub mod user;

pub use course::create_course;
pub use follow::{create_follow, create_follow_request};
pub use invitation::create_invitation;
pub use organization::{create_member, create_organization};
pub use post::create_post;
pub use user::create_user;
