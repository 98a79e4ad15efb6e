//! Core Kernel - Foundational types for the underwriting core
//!
//! This crate provides the building blocks used by the domain crates:
//! - Money types with precise decimal arithmetic
//! - Calendar arithmetic for policy terms and ages
//! - Strongly-typed identifiers
//! - Port error types for the repository boundary

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{PolicyTerm, Timezone, TemporalError, age_on, policy_end_date};
pub use identifiers::{ProductId, PolicyId, ClientId, AgentId};
pub use ports::{DomainPort, PortError};
