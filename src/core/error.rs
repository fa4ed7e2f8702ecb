use thiserror::Error;

/// Errors that can occur while building or mutating a return document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RetoureError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required precondition was not met (e.g. missing customer,
    /// empty selection). No state was mutated.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The referenced return line does not exist in the document.
    #[error("unknown return line: {0}")]
    UnknownLine(String),

    /// A remote collaborator (candidate query, item registry) failed.
    #[error("remote service error: {0}")]
    Remote(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot/index path to the invalid field (e.g. "lines[2].qty").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
