//! Product Catalog
//!
//! Read-only lookup of per-product configuration: numeric bounds, fixed
//! values, optional benefits, and list cardinality limits.
//!
//! # Catalog document
//!
//! ```json
//! {
//!   "products": [
//!     {
//!       "id": "5b0f7c1e-2f4a-4f57-9a43-3c1d2b8e9f10",
//!       "name": "Accidental Death Standalone",
//!       "family": "add_standalone",
//!       "min_age": 18, "max_age": 70,
//!       "min_coverage": "5000", "max_coverage": "250000",
//!       "min_premium": "5",
//!       "duration_months": 12,
//!       "max_beneficiaries": 0
//!     }
//!   ]
//! }
//! ```
//!
//! Cardinality limits are asymmetric: `max_beneficiaries == 0` means
//! unlimited, `max_dependents == 0` means dependents are not allowed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use core_kernel::{Currency, ProductId};

use crate::error::{CatalogError, ConfigurationError};
use crate::family::ProductFamily;
use crate::premium::PaymentFrequency;

/// Named catalog bounds and fixed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    MinAge,
    MaxAge,
    MinCoverage,
    MaxCoverage,
    MinPremium,
    MaxPremium,
    MinDeductible,
    MaxDeductible,
    Coinsurance,
    MaxAnnualOutOfPocket,
    DurationMonths,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Bound::MinAge => "min_age",
            Bound::MaxAge => "max_age",
            Bound::MinCoverage => "min_coverage",
            Bound::MaxCoverage => "max_coverage",
            Bound::MinPremium => "min_premium",
            Bound::MaxPremium => "max_premium",
            Bound::MinDeductible => "min_deductible",
            Bound::MaxDeductible => "max_deductible",
            Bound::Coinsurance => "coinsurance_percent",
            Bound::MaxAnnualOutOfPocket => "max_annual_out_of_pocket",
            Bound::DurationMonths => "duration_months",
        };
        f.write_str(s)
    }
}

/// Configuration of a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub id: ProductId,
    pub name: String,
    pub family: ProductFamily,
    #[serde(default)]
    pub currency: Currency,

    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub min_coverage: Option<Decimal>,
    pub max_coverage: Option<Decimal>,
    pub min_premium: Option<Decimal>,
    pub max_premium: Option<Decimal>,
    pub min_deductible: Option<Decimal>,
    pub max_deductible: Option<Decimal>,
    /// Offered deductible tiers; empty means any value in the min/max range
    #[serde(default)]
    pub deductible_options: Vec<Decimal>,

    pub coinsurance_percent: Option<Decimal>,
    pub max_annual_out_of_pocket: Option<Decimal>,
    pub duration_months: Option<u32>,
    pub payment_frequency: Option<PaymentFrequency>,

    #[serde(default)]
    pub has_dental_basic: bool,
    #[serde(default)]
    pub offers_dental_premium: bool,
    #[serde(default)]
    pub offers_vision: bool,

    #[serde(default)]
    pub max_beneficiaries: u32,
    #[serde(default)]
    pub max_dependents: u32,
}

impl ProductConfig {
    /// Creates a config with no bounds set
    pub fn new(id: ProductId, name: impl Into<String>, family: ProductFamily) -> Self {
        Self {
            id,
            name: name.into(),
            family,
            currency: Currency::default(),
            min_age: None,
            max_age: None,
            min_coverage: None,
            max_coverage: None,
            min_premium: None,
            max_premium: None,
            min_deductible: None,
            max_deductible: None,
            deductible_options: Vec::new(),
            coinsurance_percent: None,
            max_annual_out_of_pocket: None,
            duration_months: None,
            payment_frequency: None,
            has_dental_basic: false,
            offers_dental_premium: false,
            offers_vision: false,
            max_beneficiaries: 0,
            max_dependents: 0,
        }
    }

    /// Returns true if the bound carries a value
    pub fn has_bound(&self, bound: Bound) -> bool {
        match bound {
            Bound::MinAge => self.min_age.is_some(),
            Bound::MaxAge => self.max_age.is_some(),
            Bound::MinCoverage => self.min_coverage.is_some(),
            Bound::MaxCoverage => self.max_coverage.is_some(),
            Bound::MinPremium => self.min_premium.is_some(),
            Bound::MaxPremium => self.max_premium.is_some(),
            Bound::MinDeductible => self.min_deductible.is_some(),
            Bound::MaxDeductible => self.max_deductible.is_some(),
            Bound::Coinsurance => self.coinsurance_percent.is_some(),
            Bound::MaxAnnualOutOfPocket => self.max_annual_out_of_pocket.is_some(),
            Bound::DurationMonths => self.duration_months.is_some(),
        }
    }

    /// Checks that every bound the family needs is present and ordered
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingBound` for the first absent bound,
    /// `ConfigurationError::InvertedBounds` when a minimum exceeds its
    /// maximum, and `ConfigurationError::InvalidBound` for a zero-month term
    /// or a deductible option outside the deductible range.
    pub fn ensure_complete(&self) -> Result<(), ConfigurationError> {
        if let Some(bound) = self
            .family
            .required_bounds()
            .iter()
            .copied()
            .find(|b| !self.has_bound(*b))
        {
            return Err(ConfigurationError::MissingBound {
                product: self.id,
                family: self.family,
                bound,
            });
        }

        let ages = self.min_age.zip(self.max_age).map(|(a, b)| a > b);
        let pairs = [
            (Bound::MinAge, Bound::MaxAge, ages.unwrap_or(false)),
            (Bound::MinCoverage, Bound::MaxCoverage, inverted(self.min_coverage, self.max_coverage)),
            (Bound::MinPremium, Bound::MaxPremium, inverted(self.min_premium, self.max_premium)),
            (Bound::MinDeductible, Bound::MaxDeductible, inverted(self.min_deductible, self.max_deductible)),
        ];
        if let Some((lower, upper, _)) = pairs.into_iter().find(|(_, _, bad)| *bad) {
            return Err(ConfigurationError::InvertedBounds {
                product: self.id,
                lower,
                upper,
            });
        }

        if self.duration_months == Some(0) {
            return Err(ConfigurationError::InvalidBound {
                product: self.id,
                bound: Bound::DurationMonths,
                reason: "a term must last at least one month".to_string(),
            });
        }

        let below = self.min_deductible.filter(|min| self.deductible_options.iter().any(|o| o < min));
        let above = self.max_deductible.filter(|max| self.deductible_options.iter().any(|o| o > max));
        if let Some((bound, limit)) = below
            .map(|min| (Bound::MinDeductible, min))
            .or(above.map(|max| (Bound::MaxDeductible, max)))
        {
            return Err(ConfigurationError::InvalidBound {
                product: self.id,
                bound,
                reason: format!("a deductible option lies beyond {}", limit.normalize()),
            });
        }

        Ok(())
    }

    /// Upper limit on beneficiaries, `None` meaning unlimited
    pub fn beneficiary_limit(&self) -> Option<usize> {
        match self.max_beneficiaries {
            0 => None,
            n => Some(n as usize),
        }
    }

    /// Whether the product offers dental cover of any kind
    pub fn offers_dental(&self) -> bool {
        self.has_dental_basic || self.offers_dental_premium
    }
}

fn inverted(lower: Option<Decimal>, upper: Option<Decimal>) -> bool {
    matches!((lower, upper), (Some(l), Some(u)) if l > u)
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<ProductConfig>,
}

/// In-memory product catalog
///
/// Holds configurations keyed by product id. Lookups validate the
/// configuration against its family before handing it out, so a product
/// with a missing bound is never priced.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: HashMap<ProductId, ProductConfig>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from configurations, rejecting duplicate ids
    pub fn from_products(products: impl IntoIterator<Item = ProductConfig>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    /// Loads a catalog document from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_products(document.products)
    }

    /// Loads a catalog document from a file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| CatalogError::FileNotFound(path.display().to_string()))?;
        Self::from_json_str(&content)
    }

    /// Adds a product
    pub fn insert(&mut self, product: ProductConfig) -> Result<(), CatalogError> {
        if self.products.contains_key(&product.id) {
            return Err(CatalogError::Duplicate(product.id));
        }
        self.products.insert(product.id, product);
        Ok(())
    }

    /// Raw configuration, not checked against its family
    pub fn get(&self, id: &ProductId) -> Option<&ProductConfig> {
        self.products.get(id)
    }

    /// Looks a product up and validates its configuration
    ///
    /// # Errors
    ///
    /// `ConfigurationError::UnknownProduct` for an unknown id, or the error
    /// from [`ProductConfig::ensure_complete`].
    pub fn lookup(&self, id: &ProductId) -> Result<&ProductConfig, ConfigurationError> {
        let config = self
            .products
            .get(id)
            .ok_or(ConfigurationError::UnknownProduct(*id))?;
        config.ensure_complete()?;
        Ok(config)
    }

    /// Products of one family
    pub fn by_family(&self, family: ProductFamily) -> Vec<&ProductConfig> {
        let mut products: Vec<_> = self
            .products
            .values()
            .filter(|p| p.family == family)
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn health_basic() -> ProductConfig {
        let mut config = ProductConfig::new(ProductId::new(), "Health Basic", ProductFamily::HealthBasic);
        config.min_premium = Some(dec!(50));
        config.max_premium = Some(dec!(150));
        config.duration_months = Some(12);
        config
    }

    #[test]
    fn test_lookup_unknown_product() {
        let catalog = ProductCatalog::new();
        let id = ProductId::new();
        assert_eq!(catalog.lookup(&id), Err(ConfigurationError::UnknownProduct(id)));
    }

    #[test]
    fn test_lookup_missing_bound() {
        let mut config = health_basic();
        config.max_premium = None;
        let id = config.id;
        let catalog = ProductCatalog::from_products([config]).unwrap();

        assert!(matches!(
            catalog.lookup(&id),
            Err(ConfigurationError::MissingBound { bound: Bound::MaxPremium, .. })
        ));
    }

    #[test]
    fn test_lookup_inverted_bounds() {
        let mut config = health_basic();
        config.min_premium = Some(dec!(200));
        let id = config.id;
        let catalog = ProductCatalog::from_products([config]).unwrap();

        assert!(matches!(
            catalog.lookup(&id),
            Err(ConfigurationError::InvertedBounds { lower: Bound::MinPremium, .. })
        ));
    }

    #[test]
    fn test_zero_month_term_rejected() {
        let mut config = health_basic();
        config.duration_months = Some(0);

        assert!(matches!(
            config.ensure_complete(),
            Err(ConfigurationError::InvalidBound { bound: Bound::DurationMonths, .. })
        ));
    }

    #[test]
    fn test_deductible_option_outside_range_rejected() {
        let mut config = ProductConfig::new(ProductId::new(), "Health Intermediate", ProductFamily::HealthIntermediate);
        config.min_premium = Some(dec!(300));
        config.max_premium = Some(dec!(400));
        config.min_deductible = Some(dec!(1000));
        config.max_deductible = Some(dec!(5000));
        config.coinsurance_percent = Some(dec!(20));
        config.max_annual_out_of_pocket = Some(dec!(3000));
        config.duration_months = Some(12);
        config.deductible_options = vec![dec!(1000), dec!(2500), dec!(5000)];
        assert_eq!(config.ensure_complete(), Ok(()));

        config.deductible_options.push(dec!(7500));
        assert!(matches!(
            config.ensure_complete(),
            Err(ConfigurationError::InvalidBound { bound: Bound::MaxDeductible, .. })
        ));

        config.deductible_options = vec![dec!(500), dec!(2500)];
        assert!(matches!(
            config.ensure_complete(),
            Err(ConfigurationError::InvalidBound { bound: Bound::MinDeductible, .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let config = health_basic();
        let result = ProductCatalog::from_products([config.clone(), config]);
        assert!(matches!(result, Err(CatalogError::Duplicate(_))));
    }

    #[test]
    fn test_beneficiary_limit_zero_is_unlimited() {
        let mut config = health_basic();
        assert_eq!(config.beneficiary_limit(), None);
        config.max_beneficiaries = 3;
        assert_eq!(config.beneficiary_limit(), Some(3));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "products": [{
                "id": "5b0f7c1e-2f4a-4f57-9a43-3c1d2b8e9f10",
                "name": "Health Basic",
                "family": "health_basic",
                "min_premium": "50",
                "max_premium": 150,
                "duration_months": 12
            }]
        }"#;
        let catalog = ProductCatalog::from_json_str(json).unwrap();
        let id: ProductId = "5b0f7c1e-2f4a-4f57-9a43-3c1d2b8e9f10".parse().unwrap();
        let config = catalog.lookup(&id).unwrap();
        assert_eq!(config.max_premium, Some(dec!(150)));
        assert_eq!(config.currency, Currency::USD);
        assert!(!config.offers_dental());
    }

    #[test]
    fn test_from_json_str_reports_parse_errors() {
        let result = ProductCatalog::from_json_str("{\"products\": [{}]}");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
