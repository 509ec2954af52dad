use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("empty input: the cost matrix has no points")]
    EmptyInput,
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),
    #[error("invalid start index: {start} is outside [0, {n})")]
    InvalidStartIndex { start: usize, n: usize },
    #[error("exact solver supports at most {max} points, got {n}")]
    ExactLimitExceeded { n: usize, max: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
