use sea_orm::{DbErr, SqlErr};

/// Outcome tag of a mutating service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Created,
    Updated,
    Deleted,
    NotFound,
    AlreadyExists,
    NotLinked,
    Error,
}

/// Uniform result of every mutating service operation.
///
/// Expected failures (missing rows, duplicate or missing links) are reported
/// through `status` and `messages` instead of an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: ServiceStatus,
    pub messages: Vec<String>,
    /// Set only for `Created`.
    pub created_id: Option<i32>,
}

impl ServiceResponse {
    fn new(status: ServiceStatus) -> Self {
        Self {
            status,
            messages: Vec::new(),
            created_id: None,
        }
    }

    pub fn created(id: i32) -> Self {
        Self {
            created_id: Some(id),
            ..Self::new(ServiceStatus::Created)
        }
    }

    pub fn updated() -> Self {
        Self::new(ServiceStatus::Updated)
    }

    pub fn deleted() -> Self {
        Self::new(ServiceStatus::Deleted)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceStatus::NotFound).with_message(message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ServiceStatus::AlreadyExists).with_message(message)
    }

    pub fn not_linked(message: impl Into<String>) -> Self {
        Self::new(ServiceStatus::NotLinked).with_message(message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ServiceStatus::Error).with_message(message)
    }

    /// Log a persistence failure and turn it into an `Error` outcome. The
    /// driver error goes to the log only; `messages` keeps `context`.
    pub fn persistence_error(context: &str, err: DbErr) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::error(context)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            ServiceStatus::Created | ServiceStatus::Updated | ServiceStatus::Deleted
        )
    }

    /// All messages joined into one line.
    pub fn message(&self) -> String {
        self.messages.join(" ")
    }
}

/// `true` when the error is a primary-key or unique-index violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
