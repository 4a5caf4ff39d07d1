use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Configuration { message: String },

    #[error("Qdrant request failed ({status}): {message}")]
    VectorStore { status: u16, message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn vector_store(status: u16, message: impl Into<String>) -> Self {
        Self::VectorStore {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let error = DomainError::validation("知识库名称不能为空");
        assert_eq!(error.to_string(), "知识库名称不能为空");
    }

    #[test]
    fn test_vector_store_error_message() {
        let error = DomainError::vector_store(409, "collection already exists");
        assert_eq!(
            error.to_string(),
            "Qdrant request failed (409): collection already exists"
        );
    }

    #[test]
    fn test_not_found_error_message() {
        let error = DomainError::not_found("未找到指定 Chunk");
        assert_eq!(error.to_string(), "未找到指定 Chunk");
    }
}
