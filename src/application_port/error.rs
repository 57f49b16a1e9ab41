use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForumError {
    #[error("{entity} with {key} {value} not found.")]
    NotFound {
        entity: &'static str,
        key: &'static str,
        value: String,
    },
    #[error("{entity} with {field} {value} already exists.")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Authentication(String),
    #[error("store error: {0}")]
    Store(String),
}

impl ForumError {
    pub fn not_found(entity: &'static str, key: &'static str, value: impl Display) -> Self {
        ForumError::NotFound {
            entity,
            key,
            value: value.to_string(),
        }
    }

    pub fn duplicate(entity: &'static str, field: &'static str, value: impl Display) -> Self {
        ForumError::Duplicate {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        ForumError::Authorization(message.into())
    }

    pub fn store(error: impl Display) -> Self {
        ForumError::Store(error.to_string())
    }
}
