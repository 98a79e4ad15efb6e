//! Repository boundary
//!
//! The underwriting core never reads products, profiles or policies from a
//! store itself. Domain crates declare the repository traits they need and
//! the host application injects adapters for them; every adapter reports
//! failures as a [`PortError`].

use std::fmt;
use thiserror::Error;

/// Failure reported by a repository adapter
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("store unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        PortError::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker for repository traits; adapters are shared behind `Arc` across tasks.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_product() {
        let error = PortError::not_found("Product", "PRD-123");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Product PRD-123 not found");
    }

    #[test]
    fn test_unavailable_is_not_a_missing_record() {
        let error = PortError::unavailable("connection refused");
        assert!(!error.is_not_found());
        assert_eq!(error.to_string(), "store unavailable: connection refused");
    }
}
