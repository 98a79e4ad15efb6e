//! Submission Service Tests
//!
//! Drives the async service against the in-memory repositories:
//! - Valid drafts are stored and get an id
//! - Invalid drafts are returned with their violations and never stored
//! - Product lookup failures surface as configuration errors
//! - An unreachable store surfaces as a repository error
//! - Agent and client options are listed for the intake form

use std::sync::Arc;

use async_trait::async_trait;
use core_kernel::{AgentId, ClientId, DomainPort, PolicyId, PortError, ProductId};
use domain_underwriting::{
    AgentProfile, ClientProfile, ConfigurationError, Field, MockPolicyRepository,
    MockProductRepository, MockProfileRepository, PolicyPayload, PolicyRepository, ProductCatalog,
    ProductConfig, ProductFamily, ProductRepository, Rule, SubmissionOutcome, SubmissionService,
    UnderwritingError, UnderwritingSettings,
};
use rust_decimal_macros::dec;
use test_utils::*;

struct Harness {
    service: SubmissionService,
    profiles: Arc<MockProfileRepository>,
    policies: Arc<MockPolicyRepository>,
}

async fn harness() -> Harness {
    init_tracing();
    let products = Arc::new(MockProductRepository::with_products(ProductFixtures::all()).await);
    let profiles = Arc::new(MockProfileRepository::new());
    let policies = Arc::new(MockPolicyRepository::new());
    let service = SubmissionService::new(
        products,
        profiles.clone(),
        policies.clone(),
        UnderwritingSettings::default(),
    );
    Harness {
        service,
        profiles,
        policies,
    }
}

/// Store whose every call fails to connect
struct DownStore;

impl DomainPort for DownStore {}

#[async_trait]
impl ProductRepository for DownStore {
    async fn get_product(&self, _id: ProductId) -> Result<ProductConfig, PortError> {
        Err(PortError::unavailable("connection refused"))
    }
}

#[async_trait]
impl PolicyRepository for DownStore {
    async fn insert_policy(&self, _payload: &PolicyPayload) -> Result<PolicyId, PortError> {
        Err(PortError::unavailable("connection refused"))
    }
}

mod submit {
    use super::*;

    #[tokio::test]
    async fn test_valid_draft_is_stored() {
        let harness = harness().await;
        let config = ProductFixtures::health_premier();
        let draft = DraftBuilder::valid_for(&config).build();

        let outcome = harness
            .service
            .submit(config.id, &draft, DateFixtures::as_of())
            .await
            .unwrap();

        let policy_id = outcome.policy_id().unwrap();
        let stored = harness.policies.get(policy_id).await.unwrap();
        assert_money_eq(&stored.premium_amount, dec!(500));
        assert_eq!(stored.product_id, config.id);
        assert_eq!(harness.policies.count().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_stored() {
        let harness = harness().await;
        let config = ProductFixtures::life_basic();
        let draft = DraftBuilder::valid_for(&config).age(70).build();

        let outcome = harness
            .service
            .submit(config.id, &draft, DateFixtures::as_of())
            .await
            .unwrap();

        match outcome {
            SubmissionOutcome::Rejected(violations) => {
                assert_has_violation(&violations, Field::AgeAtInscription, Rule::AgeOutOfRange);
            }
            SubmissionOutcome::Submitted { .. } => panic!("Expected rejection"),
        }
        assert_eq!(harness.policies.count().await, 0);
    }

    #[tokio::test]
    async fn test_each_submission_gets_its_own_id() {
        let harness = harness().await;
        let config = ProductFixtures::add_standalone();
        let draft = DraftBuilder::valid_for(&config).build();

        let first = harness
            .service
            .submit(config.id, &draft, DateFixtures::as_of())
            .await
            .unwrap();
        let second = harness
            .service
            .submit(config.id, &draft, DateFixtures::as_of())
            .await
            .unwrap();

        assert_ne!(first.policy_id(), second.policy_id());
        assert_eq!(harness.policies.count().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let harness = harness().await;
        let id = ProductId::new();

        let err = harness
            .service
            .submit(id, &DraftBuilder::new().build(), DateFixtures::as_of())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UnderwritingError::Configuration(ConfigurationError::UnknownProduct(unknown)) if unknown == id
        ));
    }

    #[tokio::test]
    async fn test_incomplete_product_from_repository() {
        let mut config = ProductFixtures::add_standalone();
        config.min_premium = None;
        let products = Arc::new(MockProductRepository::with_products(vec![config.clone()]).await);
        let policies = Arc::new(MockPolicyRepository::new());
        let service = SubmissionService::new(
            products,
            Arc::new(MockProfileRepository::new()),
            policies.clone(),
            UnderwritingSettings::default(),
        );

        let draft = DraftBuilder::valid_for(&config).build();
        let err = service
            .submit(config.id, &draft, DateFixtures::as_of())
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(policies.count().await, 0);
    }

    #[tokio::test]
    async fn test_unavailable_product_store_is_a_repository_error() {
        let service = SubmissionService::new(
            Arc::new(DownStore),
            Arc::new(MockProfileRepository::new()),
            Arc::new(MockPolicyRepository::new()),
            UnderwritingSettings::default(),
        );
        let config = ProductFixtures::health_basic();

        let err = service
            .submit(config.id, &DraftBuilder::valid_for(&config).build(), DateFixtures::as_of())
            .await
            .unwrap_err();

        assert!(matches!(err, UnderwritingError::Repository(PortError::Unavailable { .. })));
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn test_failed_insert_is_a_repository_error() {
        let service = SubmissionService::new(
            Arc::new(MockProductRepository::with_products(ProductFixtures::all()).await),
            Arc::new(MockProfileRepository::new()),
            Arc::new(DownStore),
            UnderwritingSettings::default(),
        );
        let config = ProductFixtures::life_dependents();

        let err = service
            .submit(config.id, &DraftBuilder::valid_for(&config).build(), DateFixtures::as_of())
            .await
            .unwrap_err();

        assert!(matches!(err, UnderwritingError::Repository(PortError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_catalog_as_product_source() {
        let catalog = ProductCatalog::from_products(ProductFixtures::all()).unwrap();
        let policies = Arc::new(MockPolicyRepository::new());
        let service = SubmissionService::new(
            Arc::new(catalog),
            Arc::new(MockProfileRepository::new()),
            policies.clone(),
            UnderwritingSettings::default(),
        );
        let config = ProductFixtures::health_basic();

        let outcome = service
            .submit(config.id, &DraftBuilder::valid_for(&config).build(), DateFixtures::as_of())
            .await
            .unwrap();

        assert!(outcome.policy_id().is_some());
        assert_eq!(policies.count().await, 1);
    }
}

mod evaluate {
    use super::*;

    #[tokio::test]
    async fn test_evaluation_matches_engine() {
        let harness = harness().await;
        let config = ProductFixtures::health_intermediate();
        let draft = DraftBuilder::valid_for(&config).deductible(dec!(1000)).build();

        let evaluation = harness
            .service
            .evaluate(config.id, &draft, DateFixtures::as_of())
            .await
            .unwrap();

        assert_no_violations(&evaluation.violations);
        assert_money_eq(&evaluation.premium.unwrap().amount, dec!(320));
        assert_eq!(harness.policies.count().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_evaluations() {
        let harness = Arc::new(harness().await);
        let mut handles = Vec::new();

        for family in ProductFamily::ALL {
            let harness = harness.clone();
            handles.push(tokio::spawn(async move {
                let config = ProductFixtures::for_family(family);
                let draft = DraftBuilder::valid_for(&config).build();
                harness
                    .service
                    .evaluate(config.id, &draft, DateFixtures::as_of())
                    .await
                    .map(|evaluation| evaluation.is_valid())
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }
    }
}

mod selection {
    use super::*;

    #[tokio::test]
    async fn test_lists_agents_and_clients() {
        let harness = harness().await;
        harness
            .profiles
            .add_agent(AgentProfile {
                id: AgentId::new(),
                name: fake_name(),
                email: "agent@example.com".to_string(),
            })
            .await;
        for _ in 0..3 {
            harness
                .profiles
                .add_client(ClientProfile {
                    id: ClientId::new(),
                    name: fake_name(),
                    email: "client@example.com".to_string(),
                })
                .await;
        }

        let options = harness.service.selection_options().await.unwrap();

        assert_eq!(options.agents.len(), 1);
        assert_eq!(options.clients.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let harness = harness().await;
        let options = harness.service.selection_options().await.unwrap();
        assert!(options.agents.is_empty());
        assert!(options.clients.is_empty());
    }
}

mod family_coverage {
    use super::*;

    #[tokio::test]
    async fn test_every_family_submits() {
        let harness = harness().await;

        for family in ProductFamily::ALL {
            let config = ProductFixtures::for_family(family);
            let draft = DraftBuilder::valid_for(&config).build();
            let outcome = harness
                .service
                .submit(config.id, &draft, DateFixtures::as_of())
                .await
                .unwrap();
            assert!(outcome.policy_id().is_some(), "{} was rejected", family);
        }

        assert_eq!(harness.policies.count().await, ProductFamily::ALL.len());
    }
}
