//! Underwriting Domain
//!
//! Rule core of the brokerage's policy intake: per-product eligibility
//! constraints, checks over beneficiary and dependent lists, and premium
//! derivation for eight product families.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! ProductCatalog ─┐
//!                 ├─> ValidationPipeline ─> SubmissionGate ─> PolicyPayload
//! PolicyDraft ────┘     │         │
//!                       │         └─ FamilyRules (one per ProductFamily)
//!                       └─ list validator, premium calculator
//! ```
//!
//! Everything up to the payload is synchronous and pure; "today" is passed
//! in. The async [`SubmissionService`] drives the same engine against
//! injected repositories.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_underwriting::{UnderwritingEngine, BuildOutcome};
//!
//! match engine.build(&product_id, &draft, today)? {
//!     BuildOutcome::Ready(payload) => policies.insert_policy(&payload).await?,
//!     BuildOutcome::Rejected(violations) => show(violations),
//! }
//! ```

pub mod catalog;
pub mod draft;
pub mod engine;
pub mod error;
pub mod family;
pub mod intake;
pub mod list_validator;
pub mod pipeline;
pub mod ports;
pub mod premium;
pub mod rules;
pub mod services;
pub mod settings;
pub mod status;
pub mod submission;
pub mod violation;

pub use catalog::{Bound, ProductCatalog, ProductConfig};
pub use draft::{Beneficiary, Dependent, Field, PolicyDraft, Relationship};
pub use engine::{BuildOutcome, UnderwritingEngine};
pub use error::{CatalogError, ConfigurationError, UnderwritingError};
pub use family::{PremiumBasis, ProductFamily};
pub use intake::{parse_draft, ParsedDraft};
pub use pipeline::{Evaluation, ValidationPipeline};
pub use ports::{AgentProfile, ClientProfile, PolicyRepository, ProductRepository, ProfileRepository};
pub use premium::{DeductibleTier, PaymentFrequency, PremiumComponent, PremiumQuote};
pub use services::{SelectionOptions, SubmissionOutcome, SubmissionService};
pub use settings::{FloorTarget, UnderwritingSettings};
pub use status::PolicyStatus;
pub use submission::{PolicyPayload, SubmissionGate};
pub use violation::{FieldPath, Rule, Violation, Violations};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockPolicyRepository, MockProductRepository, MockProfileRepository};
