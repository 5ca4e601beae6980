//! Record operation failures

/// Failure of a record operation, classified for the HTTP layer
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Required body fields absent or empty
    #[error("CertNo and NAME are required (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Lookup by id found nothing
    #[error("No user found with id: {0}")]
    RecordNotFound(String),

    /// Update or delete target does not exist
    #[error("Intern with CertNo {0} not found")]
    KeyNotFound(String),

    /// The configured tab is missing from the spreadsheet metadata
    #[error("Sheet/tab named \"{0}\" not found")]
    TabNotFound(String),

    /// Anything that went wrong talking to the Sheets API
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}
