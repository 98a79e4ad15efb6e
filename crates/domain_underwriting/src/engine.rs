//! Underwriting engine
//!
//! Synchronous entry point combining the catalog, the pipeline, and the
//! submission gate. The same engine backs live form feedback and the
//! authoritative check before a policy is stored.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_underwriting::{UnderwritingEngine, ProductCatalog, UnderwritingSettings};
//!
//! let catalog = ProductCatalog::from_file(Path::new("products.json"))?;
//! let engine = UnderwritingEngine::new(catalog, UnderwritingSettings::default());
//!
//! let evaluation = engine.evaluate(&product_id, &draft, today)?;
//! for violation in &evaluation.violations {
//!     println!("{}", violation);
//! }
//! ```

use chrono::NaiveDate;
use tracing::{debug, warn};

use core_kernel::ProductId;

use crate::catalog::{ProductCatalog, ProductConfig};
use crate::draft::{Field, PolicyDraft};
use crate::error::{ConfigurationError, UnderwritingError};
use crate::pipeline::{Evaluation, ValidationPipeline};
use crate::settings::UnderwritingSettings;
use crate::submission::{PolicyPayload, SubmissionGate};
use crate::violation::Violation;

/// Result of asking for a payload
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// The draft is valid and ready to persist
    Ready(PolicyPayload),
    /// The draft still has violations
    Rejected(Vec<Violation>),
}

impl BuildOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, BuildOutcome::Ready(_))
    }

    pub fn payload(&self) -> Option<&PolicyPayload> {
        match self {
            BuildOutcome::Ready(payload) => Some(payload),
            BuildOutcome::Rejected(_) => None,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            BuildOutcome::Ready(_) => &[],
            BuildOutcome::Rejected(violations) => violations,
        }
    }
}

/// Evaluates drafts against a product catalog
#[derive(Debug, Clone, Default)]
pub struct UnderwritingEngine {
    catalog: ProductCatalog,
    settings: UnderwritingSettings,
}

impl UnderwritingEngine {
    pub fn new(catalog: ProductCatalog, settings: UnderwritingSettings) -> Self {
        Self { catalog, settings }
    }

    /// Loads settings from the environment and the catalog from the path
    /// they name
    pub fn from_env() -> Result<Self, UnderwritingError> {
        let settings = UnderwritingSettings::from_env()?;
        let catalog = match &settings.catalog_path {
            Some(path) => ProductCatalog::from_file(path)?,
            None => ProductCatalog::new(),
        };
        Ok(Self::new(catalog, settings))
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &UnderwritingSettings {
        &self.settings
    }

    fn lookup(&self, product_id: &ProductId) -> Result<&ProductConfig, UnderwritingError> {
        self.catalog.lookup(product_id).map_err(|err| {
            warn!(product_id = %product_id, error = %err, "Product configuration rejected");
            UnderwritingError::from(err)
        })
    }

    /// Prices and validates a draft
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the product is unknown or
    /// incomplete. Rule failures are in the returned violations.
    pub fn evaluate(
        &self,
        product_id: &ProductId,
        draft: &PolicyDraft,
        as_of: NaiveDate,
    ) -> Result<Evaluation, UnderwritingError> {
        let config = self.lookup(product_id)?;
        Ok(self.evaluate_config(config, draft, as_of))
    }

    /// Like [`evaluate`](Self::evaluate) with today's date in the configured
    /// timezone
    pub fn evaluate_today(&self, product_id: &ProductId, draft: &PolicyDraft) -> Result<Evaluation, UnderwritingError> {
        self.evaluate(product_id, draft, self.settings.timezone.today())
    }

    /// Evaluates against a configuration obtained outside the catalog
    pub fn evaluate_with_config(
        &self,
        config: &ProductConfig,
        draft: &PolicyDraft,
        as_of: NaiveDate,
    ) -> Result<Evaluation, UnderwritingError> {
        ensure_complete(config)?;
        Ok(self.evaluate_config(config, draft, as_of))
    }

    fn evaluate_config(&self, config: &ProductConfig, draft: &PolicyDraft, as_of: NaiveDate) -> Evaluation {
        let evaluation = ValidationPipeline::new(&self.settings).evaluate(config, draft, as_of);
        debug!(
            product_id = %config.id,
            family = %config.family,
            violations = evaluation.violations.len(),
            premium = ?evaluation.premium.as_ref().map(|q| q.amount.to_string()),
            "Draft evaluated"
        );
        evaluation
    }

    /// Violations on a single field
    pub fn validate_field(
        &self,
        product_id: &ProductId,
        draft: &PolicyDraft,
        field: Field,
        as_of: NaiveDate,
    ) -> Result<Vec<Violation>, UnderwritingError> {
        let config = self.lookup(product_id)?;
        Ok(ValidationPipeline::new(&self.settings).validate_field(config, draft, field, as_of))
    }

    /// Builds the payload for a valid draft or returns its violations
    pub fn build(
        &self,
        product_id: &ProductId,
        draft: &PolicyDraft,
        as_of: NaiveDate,
    ) -> Result<BuildOutcome, UnderwritingError> {
        let config = self.lookup(product_id)?;
        self.build_config(config, draft, as_of)
    }

    /// Builds against a configuration obtained outside the catalog
    pub fn build_with_config(
        &self,
        config: &ProductConfig,
        draft: &PolicyDraft,
        as_of: NaiveDate,
    ) -> Result<BuildOutcome, UnderwritingError> {
        ensure_complete(config)?;
        self.build_config(config, draft, as_of)
    }

    fn build_config(
        &self,
        config: &ProductConfig,
        draft: &PolicyDraft,
        as_of: NaiveDate,
    ) -> Result<BuildOutcome, UnderwritingError> {
        let evaluation = self.evaluate_config(config, draft, as_of);
        if !evaluation.is_valid() {
            return Ok(BuildOutcome::Rejected(evaluation.violations));
        }

        let payload = SubmissionGate::new(config).build(draft, evaluation.premium.as_ref())?;
        Ok(BuildOutcome::Ready(payload))
    }
}

fn ensure_complete(config: &ProductConfig) -> Result<(), ConfigurationError> {
    config.ensure_complete().map_err(|err| {
        warn!(product_id = %config.id, error = %err, "Product configuration rejected");
        err
    })
}
