//! Underwriting domain errors
//!
//! Only conditions that make a run meaningless are errors. Rule failures on
//! a draft are reported as [`Violation`](crate::violation::Violation) values
//! and collected instead.

use thiserror::Error;

use core_kernel::{PortError, ProductId, TemporalError};

use crate::catalog::Bound;
use crate::draft::Field;
use crate::family::ProductFamily;

/// Fatal product configuration problems
///
/// Raised before any validation or pricing runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("Product {product} ({family}) is missing required bound {bound}")]
    MissingBound {
        product: ProductId,
        family: ProductFamily,
        bound: Bound,
    },

    #[error("Product {product} has {lower} greater than {upper}")]
    InvertedBounds {
        product: ProductId,
        lower: Bound,
        upper: Bound,
    },

    #[error("Product {product} has an unusable {bound}: {reason}")]
    InvalidBound {
        product: ProductId,
        bound: Bound,
        reason: String,
    },
}

/// Errors raised while loading a catalog document
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Catalog file not found: {0}")]
    FileNotFound(String),

    #[error("Duplicate product id: {0}")]
    Duplicate(ProductId),
}

/// Top-level error for the underwriting core
#[derive(Debug, Error)]
pub enum UnderwritingError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Repository error: {0}")]
    Repository(#[from] PortError),

    #[error("Date error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Settings error: {0}")]
    Settings(String),

    /// The submission gate was handed a draft that skipped validation
    #[error("Draft is missing {0}; run validation before building a payload")]
    Unvalidated(Field),
}

impl From<config::ConfigError> for UnderwritingError {
    fn from(err: config::ConfigError) -> Self {
        UnderwritingError::Settings(err.to_string())
    }
}

impl UnderwritingError {
    /// Returns true if the error comes from product configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, UnderwritingError::Configuration(_))
    }
}
