use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("Already checked out today")]
    AlreadyCheckedOut,

    #[error("You have not checked in today")]
    NotCheckedIn,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store failure: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AttendanceError>;

impl AttendanceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AttendanceError::NotFound(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        AttendanceError::InvalidInput(what.into())
    }

    /// True for the double-action rejections the classifier reports.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AttendanceError::AlreadyCheckedIn
                | AttendanceError::AlreadyCheckedOut
                | AttendanceError::NotCheckedIn
        )
    }
}
