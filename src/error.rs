use thiserror::Error;

/// Broad class of an [`AppError`], used to pick the message shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The table has to be created before the operation can run.
    Precondition,
    /// Arguments were missing or malformed.
    Format,
    /// Storage could not be reached or a statement failed.
    Connectivity,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("table `{0}` does not exist")]
    MissingTable(&'static str),

    #[error("expected 3 arguments (fullname, birth date, gender), got {0}")]
    Arity(usize),

    #[error("invalid birth date `{input}`, expected YYYY-MM-DD: {source}")]
    DateFormat {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid gender `{0}`, expected Male or Female")]
    Gender(String),

    #[error("invalid birth year range {min}..={max}")]
    InvalidYearRange { min: i32, max: i32 },

    #[error(transparent)]
    Storage(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingTable(_) => ErrorKind::Precondition,
            AppError::Arity(_)
            | AppError::DateFormat { .. }
            | AppError::Gender(_)
            | AppError::InvalidYearRange { .. } => ErrorKind::Format,
            AppError::Storage(_) | AppError::Io(_) => ErrorKind::Connectivity,
        }
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        assert_eq!(
            AppError::MissingTable("employee_account").kind(),
            ErrorKind::Precondition
        );
        assert_eq!(AppError::Arity(2).kind(), ErrorKind::Format);
        assert_eq!(AppError::Gender("Other".into()).kind(), ErrorKind::Format);
        assert_eq!(
            AppError::Storage(sqlx::Error::PoolClosed).kind(),
            ErrorKind::Connectivity
        );
    }
}
