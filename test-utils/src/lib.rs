//! Scholarly Test Utils
//!
//! Shared testing utilities for the scholarly server. Provides a builder for test contexts
//! backed by in-memory SQLite databases, plus factories for every entity so tests only
//! spell out the fields they care about.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test schemas
//! - **TestContext**: Test environment holding the database connection and session
//! - **TestError**: Errors that can occur during test setup
//! - **factory**: Entity factories with sensible defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn follows_user() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_social_tables().build().await?;
//!     let db = test.db.as_ref().unwrap();
//!
//!     let alice = factory::user::create_user(db).await?;
//!     // ...
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
