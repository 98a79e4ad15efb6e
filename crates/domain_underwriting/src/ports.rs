//! Underwriting ports
//!
//! Async interfaces to the collaborators the core does not own: where
//! products come from, who the selectable agents and clients are, and where
//! accepted applications are stored.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_underwriting::ports::{PolicyRepository, ProductRepository, ProfileRepository};
//! use std::sync::Arc;
//!
//! let service = SubmissionService::new(
//!     Arc::new(catalog) as Arc<dyn ProductRepository>,
//!     Arc::new(profiles),
//!     Arc::new(policies),
//!     settings,
//! );
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{AgentId, ClientId, DomainPort, PolicyId, PortError, ProductId};

use crate::catalog::{ProductCatalog, ProductConfig};
use crate::submission::PolicyPayload;

/// Display record of an agent offered for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    pub name: String,
    pub email: String,
}

/// Display record of a client offered for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: ClientId,
    pub name: String,
    pub email: String,
}

/// Source of product configurations
#[async_trait]
pub trait ProductRepository: DomainPort {
    /// Fetches the configuration of a product
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if the product does not exist.
    async fn get_product(&self, id: ProductId) -> Result<ProductConfig, PortError>;
}

/// Source of agent and client display records
#[async_trait]
pub trait ProfileRepository: DomainPort {
    async fn list_agents(&self) -> Result<Vec<AgentProfile>, PortError>;

    async fn list_clients(&self) -> Result<Vec<ClientProfile>, PortError>;
}

/// Destination of accepted applications
#[async_trait]
pub trait PolicyRepository: DomainPort {
    /// Stores a payload and returns the id assigned to it
    async fn insert_policy(&self, payload: &PolicyPayload) -> Result<PolicyId, PortError>;
}

impl DomainPort for ProductCatalog {}

/// A loaded catalog serves products without validating them; the service
/// validates the configuration itself.
#[async_trait]
impl ProductRepository for ProductCatalog {
    async fn get_product(&self, id: ProductId) -> Result<ProductConfig, PortError> {
        self.get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Product", id))
    }
}

/// In-memory port implementations
///
/// These keep everything in maps behind `tokio` locks and are meant for
/// tests and local runs without a backing store.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory product source
    #[derive(Debug, Default)]
    pub struct MockProductRepository {
        products: Arc<RwLock<HashMap<ProductId, ProductConfig>>>,
    }

    impl MockProductRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with products
        pub async fn with_products(products: Vec<ProductConfig>) -> Self {
            let repo = Self::new();
            {
                let mut map = repo.products.write().await;
                for product in products {
                    map.insert(product.id, product);
                }
            }
            repo
        }
    }

    impl DomainPort for MockProductRepository {}

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn get_product(&self, id: ProductId) -> Result<ProductConfig, PortError> {
            self.products
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Product", id))
        }
    }

    /// In-memory agent and client directory
    #[derive(Debug, Default)]
    pub struct MockProfileRepository {
        agents: Arc<RwLock<Vec<AgentProfile>>>,
        clients: Arc<RwLock<Vec<ClientProfile>>>,
    }

    impl MockProfileRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn add_agent(&self, agent: AgentProfile) {
            self.agents.write().await.push(agent);
        }

        pub async fn add_client(&self, client: ClientProfile) {
            self.clients.write().await.push(client);
        }
    }

    impl DomainPort for MockProfileRepository {}

    #[async_trait]
    impl ProfileRepository for MockProfileRepository {
        async fn list_agents(&self) -> Result<Vec<AgentProfile>, PortError> {
            Ok(self.agents.read().await.clone())
        }

        async fn list_clients(&self) -> Result<Vec<ClientProfile>, PortError> {
            Ok(self.clients.read().await.clone())
        }
    }

    /// In-memory policy store
    #[derive(Debug, Default)]
    pub struct MockPolicyRepository {
        policies: Arc<RwLock<HashMap<PolicyId, PolicyPayload>>>,
    }

    impl MockPolicyRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn get(&self, id: PolicyId) -> Option<PolicyPayload> {
            self.policies.read().await.get(&id).cloned()
        }

        pub async fn count(&self) -> usize {
            self.policies.read().await.len()
        }
    }

    impl DomainPort for MockPolicyRepository {}

    #[async_trait]
    impl PolicyRepository for MockPolicyRepository {
        async fn insert_policy(&self, payload: &PolicyPayload) -> Result<PolicyId, PortError> {
            let id = PolicyId::new();
            self.policies.write().await.insert(id, payload.clone());
            Ok(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use crate::family::ProductFamily;

    #[tokio::test]
    async fn test_mock_product_not_found() {
        let repo = MockProductRepository::new();
        let err = repo.get_product(ProductId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_catalog_serves_incomplete_products() {
        let config = ProductConfig::new(ProductId::new(), "Bare", ProductFamily::HealthBasic);
        let id = config.id;
        let catalog = ProductCatalog::from_products([config]).unwrap();

        let fetched = catalog.get_product(id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert!(catalog.get_product(ProductId::new()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_mock_profiles() {
        let repo = MockProfileRepository::new();
        repo.add_agent(AgentProfile {
            id: AgentId::new(),
            name: "Marta Ruiz".to_string(),
            email: "marta@example.com".to_string(),
        })
        .await;
        assert_eq!(repo.list_agents().await.unwrap().len(), 1);
        assert!(repo.list_clients().await.unwrap().is_empty());
    }
}
