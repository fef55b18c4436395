use thiserror::Error;

/// Errors raised while preparing a test context.
#[derive(Error, Debug)]
pub enum TestError {
    /// Connecting to the in-memory database or creating a table failed.
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    /// Initializing the test session failed.
    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),
}
