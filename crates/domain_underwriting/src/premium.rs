//! Premium calculator
//!
//! One pure pricing function per derived family. Inputs are plain values
//! lifted out of a draft and its product configuration; nothing here reads
//! a clock or touches storage.
//!
//! Every quote is rounded to the currency's minor unit and carries an
//! itemised breakdown whose components add up to the quoted amount.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Currency, Money, MoneyError};

use crate::catalog::ProductConfig;
use crate::family::PremiumBasis;

/// How often the premium is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    Semiannually,
    Annually,
}

impl PaymentFrequency {
    /// Months covered by one payment
    pub fn multiplier(&self) -> Decimal {
        match self {
            PaymentFrequency::Monthly => dec!(1),
            PaymentFrequency::Quarterly => dec!(3),
            PaymentFrequency::Semiannually => dec!(6),
            PaymentFrequency::Annually => dec!(12),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Semiannually => "semiannually",
            PaymentFrequency::Annually => "annually",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "monthly" => Some(PaymentFrequency::Monthly),
            "quarterly" => Some(PaymentFrequency::Quarterly),
            "semiannually" | "semiannual" | "semi_annually" => Some(PaymentFrequency::Semiannually),
            "annually" | "annual" | "yearly" => Some(PaymentFrequency::Annually),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Position of a chosen deductible among the product's offered tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductibleTier {
    Lowest,
    Middle,
    Highest,
}

impl DeductibleTier {
    /// Monthly surcharge for the tier; a low deductible costs more
    pub fn surcharge(&self) -> Decimal {
        match self {
            DeductibleTier::Lowest => dec!(20),
            DeductibleTier::Middle => dec!(10),
            DeductibleTier::Highest => dec!(0),
        }
    }

    /// Classifies a deductible against the product's tiers
    ///
    /// Tiers come from the offered deductible options when the product lists
    /// any, otherwise from its min/max deductible. Values at or below the
    /// lowest tier are `Lowest`, at or above the highest are `Highest`.
    pub fn classify(deductible: Decimal, config: &ProductConfig) -> DeductibleTier {
        let (lowest, highest) = if config.deductible_options.is_empty() {
            (config.min_deductible, config.max_deductible)
        } else {
            (
                config.deductible_options.iter().copied().min(),
                config.deductible_options.iter().copied().max(),
            )
        };

        match (lowest, highest) {
            (Some(low), _) if deductible <= low => DeductibleTier::Lowest,
            (_, Some(high)) if deductible >= high => DeductibleTier::Highest,
            _ => DeductibleTier::Middle,
        }
    }
}

/// A labelled line of a premium breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PremiumComponent {
    pub label: &'static str,
    pub amount: Money,
}

impl PremiumComponent {
    pub fn new(label: &'static str, amount: Money) -> Self {
        Self { label, amount }
    }
}

/// Result of pricing a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PremiumQuote {
    /// Premium per payment, rounded to the currency
    pub amount: Money,
    pub basis: PremiumBasis,
    pub components: Vec<PremiumComponent>,
}

impl PremiumQuote {
    fn derived(amount: Money, components: Vec<PremiumComponent>) -> Self {
        Self {
            amount: amount.round_to_currency(),
            basis: PremiumBasis::Derived,
            components,
        }
    }

    /// Wraps a user-entered premium as a quote
    pub fn declared(amount: Money) -> Self {
        let amount = amount.round_to_currency();
        Self {
            amount,
            basis: PremiumBasis::Declared,
            components: vec![PremiumComponent::new("declared", amount)],
        }
    }

    pub fn is_derived(&self) -> bool {
        self.basis == PremiumBasis::Derived
    }
}

/// Monthly rate per unit of coverage for standalone AD&D
///
/// `0.0005 + max(0, age - 40) * 0.00001 + max(0, age - 50) * 0.00002`
pub fn add_standalone_rate(age: u32) -> Decimal {
    let over_40 = Decimal::from(age.saturating_sub(40));
    let over_50 = Decimal::from(age.saturating_sub(50));
    dec!(0.0005) + over_40 * dec!(0.00001) + over_50 * dec!(0.00002)
}

/// Standalone AD&D premium per payment
///
/// The product's premium floor is checked by the pipeline, not applied here.
///
/// # Arguments
///
/// * `coverage` - Insured amount
/// * `age` - Applicant age at inscription
/// * `frequency` - Payment frequency
///
/// # Errors
///
/// `MoneyError::Overflow` when the coverage is too large to price.
pub fn add_standalone_premium(
    coverage: Money,
    age: u32,
    frequency: PaymentFrequency,
) -> Result<PremiumQuote, MoneyError> {
    let amount = coverage
        .checked_mul(add_standalone_rate(age))?
        .checked_mul(frequency.multiplier())?;
    Ok(PremiumQuote::derived(amount, vec![PremiumComponent::new("coverage_rate", amount)]))
}

/// Life basic premium per payment: `coverage * 0.001 * multiplier`
pub fn life_basic_premium(coverage: Money, frequency: PaymentFrequency) -> Result<PremiumQuote, MoneyError> {
    let amount = coverage.checked_mul(dec!(0.001))?.checked_mul(frequency.multiplier())?;
    Ok(PremiumQuote::derived(amount, vec![PremiumComponent::new("coverage_rate", amount)]))
}

/// Inputs to the health intermediate formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthIntermediateInputs {
    pub base: Decimal,
    pub cap: Decimal,
    pub tier: DeductibleTier,
    pub dental_premium: bool,
    pub vision: bool,
    pub spouses: usize,
    pub children: usize,
}

const DENTAL_PREMIUM_ADDON: Decimal = dec!(25);
const VISION_ADDON: Decimal = dec!(10);
const SPOUSE_ADDON: Decimal = dec!(60);
const CHILD_ADDON: Decimal = dec!(40);

/// Health intermediate premium, clamped to `[base, cap]`
pub fn health_intermediate_premium(
    inputs: HealthIntermediateInputs,
    currency: Currency,
) -> Result<PremiumQuote, MoneyError> {
    let money = |amount: Decimal| Money::new(amount, currency);

    let mut components = vec![PremiumComponent::new("base", money(inputs.base))];
    if !inputs.tier.surcharge().is_zero() {
        components.push(PremiumComponent::new("deductible_surcharge", money(inputs.tier.surcharge())));
    }
    if inputs.dental_premium {
        components.push(PremiumComponent::new("dental_premium", money(DENTAL_PREMIUM_ADDON)));
    }
    if inputs.vision {
        components.push(PremiumComponent::new("vision", money(VISION_ADDON)));
    }
    if inputs.spouses > 0 {
        components.push(PremiumComponent::new(
            "spouse",
            money(SPOUSE_ADDON * Decimal::from(inputs.spouses)),
        ));
    }
    if inputs.children > 0 {
        components.push(PremiumComponent::new(
            "children",
            money(CHILD_ADDON * Decimal::from(inputs.children)),
        ));
    }

    clamped(components, inputs.base, inputs.cap, currency)
}

const PREMIER_PER_DEPENDENT: Decimal = dec!(100);

/// Health premier premium: `base + dependents * 100`, clamped to `[base, cap]`
pub fn health_premier_premium(dependents: usize, base: Money, cap: Decimal) -> Result<PremiumQuote, MoneyError> {
    let currency = base.currency();
    let mut components = vec![PremiumComponent::new("base", base)];
    if dependents > 0 {
        components.push(PremiumComponent::new(
            "dependents",
            Money::new(PREMIER_PER_DEPENDENT * Decimal::from(dependents), currency),
        ));
    }
    clamped(components, base.amount(), cap, currency)
}

fn clamped(
    mut components: Vec<PremiumComponent>,
    floor: Decimal,
    cap: Decimal,
    currency: Currency,
) -> Result<PremiumQuote, MoneyError> {
    let raw = Money::sum(currency, components.iter().map(|c| &c.amount))?;
    let total = raw.clamp(floor, cap);
    let adjustment = total
        .amount()
        .checked_sub(raw.amount())
        .ok_or_else(|| MoneyError::Overflow(format!("{} - {}", total.amount(), raw.amount())))?;
    if !adjustment.is_zero() {
        components.push(PremiumComponent::new("clamp_adjustment", Money::new(adjustment, currency)));
    }
    Ok(PremiumQuote::derived(total, components))
}
