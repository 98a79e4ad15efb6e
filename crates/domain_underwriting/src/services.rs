//! Submission service
//!
//! Async orchestration over the injected repositories. The service re-runs
//! the same engine the intake form uses for feedback, so nothing reaches the
//! policy repository without passing the authoritative check.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use core_kernel::{PolicyId, ProductId};

use crate::catalog::{ProductCatalog, ProductConfig};
use crate::draft::PolicyDraft;
use crate::engine::{BuildOutcome, UnderwritingEngine};
use crate::error::{ConfigurationError, UnderwritingError};
use crate::pipeline::Evaluation;
use crate::ports::{AgentProfile, ClientProfile, PolicyRepository, ProductRepository, ProfileRepository};
use crate::settings::UnderwritingSettings;
use crate::submission::PolicyPayload;
use crate::violation::Violation;

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Stored with the given id
    Submitted {
        policy_id: PolicyId,
        payload: PolicyPayload,
    },
    /// Not stored; the draft still has violations
    Rejected(Vec<Violation>),
}

impl SubmissionOutcome {
    pub fn policy_id(&self) -> Option<PolicyId> {
        match self {
            SubmissionOutcome::Submitted { policy_id, .. } => Some(*policy_id),
            SubmissionOutcome::Rejected(_) => None,
        }
    }
}

/// Agents and clients a draft can be assigned to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOptions {
    pub agents: Vec<AgentProfile>,
    pub clients: Vec<ClientProfile>,
}

/// Validates and stores applications through injected ports
pub struct SubmissionService {
    products: Arc<dyn ProductRepository>,
    profiles: Arc<dyn ProfileRepository>,
    policies: Arc<dyn PolicyRepository>,
    engine: UnderwritingEngine,
}

impl SubmissionService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        profiles: Arc<dyn ProfileRepository>,
        policies: Arc<dyn PolicyRepository>,
        settings: UnderwritingSettings,
    ) -> Self {
        Self {
            products,
            profiles,
            policies,
            engine: UnderwritingEngine::new(ProductCatalog::new(), settings),
        }
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<ProductConfig, UnderwritingError> {
        self.products.get_product(product_id).await.map_err(|err| {
            if err.is_not_found() {
                UnderwritingError::from(ConfigurationError::UnknownProduct(product_id))
            } else {
                UnderwritingError::from(err)
            }
        })
    }

    /// Prices and validates a draft against the repository's product
    #[instrument(skip(self, draft), fields(product_id = %product_id))]
    pub async fn evaluate(
        &self,
        product_id: ProductId,
        draft: &PolicyDraft,
        as_of: NaiveDate,
    ) -> Result<Evaluation, UnderwritingError> {
        let config = self.fetch_product(product_id).await?;
        self.engine.evaluate_with_config(&config, draft, as_of)
    }

    /// Validates a draft and stores it when it passes
    ///
    /// # Errors
    ///
    /// Configuration problems with the product and repository failures.
    /// A draft with violations is not an error; it comes back as
    /// [`SubmissionOutcome::Rejected`].
    #[instrument(skip(self, draft), fields(product_id = %product_id))]
    pub async fn submit(
        &self,
        product_id: ProductId,
        draft: &PolicyDraft,
        as_of: NaiveDate,
    ) -> Result<SubmissionOutcome, UnderwritingError> {
        let config = self.fetch_product(product_id).await?;

        let payload = match self.engine.build_with_config(&config, draft, as_of)? {
            BuildOutcome::Ready(payload) => payload,
            BuildOutcome::Rejected(violations) => {
                info!(violations = violations.len(), "Submission rejected");
                return Ok(SubmissionOutcome::Rejected(violations));
            }
        };

        let policy_id = self.policies.insert_policy(&payload).await?;
        info!(
            policy_id = %policy_id,
            family = %config.family,
            premium = %payload.premium_amount,
            "Policy submitted"
        );

        Ok(SubmissionOutcome::Submitted { policy_id, payload })
    }

    /// Agents and clients offered on the intake form
    #[instrument(skip(self))]
    pub async fn selection_options(&self) -> Result<SelectionOptions, UnderwritingError> {
        let (agents, clients) = tokio::try_join!(self.profiles.list_agents(), self.profiles.list_clients())?;
        Ok(SelectionOptions { agents, clients })
    }
}
