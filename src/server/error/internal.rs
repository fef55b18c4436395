use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// A link to the frontend could not be built from `APP_URL`.
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Failed to build link '{path}': {source}")]
    InvalidLink {
        /// Path that was being joined onto the application URL
        path: String,
        /// The underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// A row that was just written inside the current transaction could not be read back.
    #[error("{entity} {id} disappeared during the transaction")]
    MissingAfterWrite {
        /// Entity type name
        entity: &'static str,
        /// Primary key of the row
        id: i32,
    },
}
