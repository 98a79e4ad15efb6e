//! Pre-built Test Fixtures
//!
//! Product configurations for all eight families with stable ids, plus the
//! fixed dates the test suite evaluates drafts on. Values follow the product
//! sheet the rules were written against: a $5 AD&D floor, health basic
//! between $50 and $150, health intermediate from a $300 base capped at $400,
//! and so on.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{AgentId, ClientId, ProductId};
use domain_underwriting::{PaymentFrequency, ProductCatalog, ProductConfig, ProductFamily};

/// Fixture for product configurations
pub struct ProductFixtures;

impl ProductFixtures {
    /// Stable id of the fixture product of a family
    pub fn id(family: ProductFamily) -> ProductId {
        let index = ProductFamily::ALL
            .iter()
            .position(|f| *f == family)
            .unwrap_or_default() as u128;
        ProductId::from_uuid(Uuid::from_u128(0x5000_0000_0000_4000_8000_0000_0000_0001 + index))
    }

    /// Fixture product of a family
    pub fn for_family(family: ProductFamily) -> ProductConfig {
        match family {
            ProductFamily::LifeBasic => Self::life_basic(),
            ProductFamily::LifeSupplementary => Self::life_supplementary(),
            ProductFamily::LifeDependents => Self::life_dependents(),
            ProductFamily::AddStandalone => Self::add_standalone(),
            ProductFamily::HealthBasic => Self::health_basic(),
            ProductFamily::HealthIntermediate => Self::health_intermediate(),
            ProductFamily::HealthFamiliar => Self::health_familiar(),
            ProductFamily::HealthPremier => Self::health_premier(),
        }
    }

    fn base(family: ProductFamily, name: &str) -> ProductConfig {
        let mut config = ProductConfig::new(Self::id(family), name, family);
        config.duration_months = Some(12);
        config
    }

    /// Term life, ages 18 to 65, coverage 5,000 to 500,000
    pub fn life_basic() -> ProductConfig {
        let mut config = Self::base(ProductFamily::LifeBasic, "Vida Basica");
        config.min_age = Some(18);
        config.max_age = Some(65);
        config.min_coverage = Some(dec!(5000));
        config.max_coverage = Some(dec!(500000));
        config
    }

    /// Supplementary life, coverage from 10,000 and premium from 20
    pub fn life_supplementary() -> ProductConfig {
        let mut config = Self::base(ProductFamily::LifeSupplementary, "Vida Complementaria");
        config.min_age = Some(18);
        config.max_age = Some(70);
        config.min_coverage = Some(dec!(10000));
        config.min_premium = Some(dec!(20));
        config.max_beneficiaries = 5;
        config
    }

    /// Life with dependents, up to four dependents
    pub fn life_dependents() -> ProductConfig {
        let mut config = Self::base(ProductFamily::LifeDependents, "Vida Familiar");
        config.min_age = Some(18);
        config.max_age = Some(65);
        config.max_dependents = 4;
        config
    }

    /// Standalone AD&D with a 5.00 premium floor
    pub fn add_standalone() -> ProductConfig {
        let mut config = Self::base(ProductFamily::AddStandalone, "Accidentes Personales");
        config.min_age = Some(18);
        config.max_age = Some(70);
        config.min_coverage = Some(dec!(5000));
        config.max_coverage = Some(dec!(250000));
        config.min_premium = Some(dec!(5));
        config
    }

    /// Health basic, declared premium between 50 and 150
    pub fn health_basic() -> ProductConfig {
        let mut config = Self::base(ProductFamily::HealthBasic, "Salud Basico");
        config.min_premium = Some(dec!(50));
        config.max_premium = Some(dec!(150));
        config.coinsurance_percent = Some(dec!(20));
        config.max_annual_out_of_pocket = Some(dec!(5000));
        config.payment_frequency = Some(PaymentFrequency::Monthly);
        config.has_dental_basic = true;
        config
    }

    /// Health intermediate, base 300 capped at 400, three deductible tiers
    pub fn health_intermediate() -> ProductConfig {
        let mut config = Self::base(ProductFamily::HealthIntermediate, "Salud Intermedio");
        config.min_premium = Some(dec!(300));
        config.max_premium = Some(dec!(400));
        config.min_deductible = Some(dec!(1000));
        config.max_deductible = Some(dec!(5000));
        config.deductible_options = vec![dec!(1000), dec!(2500), dec!(5000)];
        config.coinsurance_percent = Some(dec!(20));
        config.max_annual_out_of_pocket = Some(dec!(3000));
        config.payment_frequency = Some(PaymentFrequency::Monthly);
        config.has_dental_basic = true;
        config.offers_dental_premium = true;
        config.offers_vision = true;
        config.max_dependents = 5;
        config
    }

    /// Health familiar, declared premium between 300 and 1200
    pub fn health_familiar() -> ProductConfig {
        let mut config = Self::base(ProductFamily::HealthFamiliar, "Salud Familiar");
        config.min_premium = Some(dec!(300));
        config.max_premium = Some(dec!(1200));
        config.coinsurance_percent = Some(dec!(10));
        config.payment_frequency = Some(PaymentFrequency::Monthly);
        config.offers_vision = true;
        config.max_dependents = 6;
        config
    }

    /// Health premier, base 400 capped at 1500
    pub fn health_premier() -> ProductConfig {
        let mut config = Self::base(ProductFamily::HealthPremier, "Salud Premier");
        config.min_premium = Some(dec!(400));
        config.max_premium = Some(dec!(1500));
        config.coinsurance_percent = Some(dec!(10));
        config.max_annual_out_of_pocket = Some(dec!(2000));
        config.payment_frequency = Some(PaymentFrequency::Monthly);
        config.has_dental_basic = true;
        config.offers_dental_premium = true;
        config.offers_vision = true;
        config.max_dependents = 12;
        config
    }

    /// All fixture products
    pub fn all() -> Vec<ProductConfig> {
        ProductFamily::ALL.iter().map(|f| Self::for_family(*f)).collect()
    }
}

static CATALOG: Lazy<ProductCatalog> = Lazy::new(|| {
    ProductCatalog::from_products(ProductFixtures::all()).expect("fixture product ids are unique")
});

/// Catalog holding every fixture product, built once per test binary
pub fn shared_catalog() -> &'static ProductCatalog {
    &CATALOG
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// The date drafts are evaluated on
    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date")
    }

    /// Coverage start a few days after `as_of`
    pub fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }

    /// Last day of a 12 month term from `start`
    pub fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 14).expect("valid date")
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }
}

/// Fixture for party references
pub struct PartyFixtures;

impl PartyFixtures {
    pub fn client_id() -> ClientId {
        ClientId::from_uuid(Uuid::from_u128(0xC000_0000_0000_4000_8000_0000_0000_0001))
    }

    pub fn agent_id() -> AgentId {
        AgentId::from_uuid(Uuid::from_u128(0xA000_0000_0000_4000_8000_0000_0000_0001))
    }
}
