use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::round_to_unit;

/// Statutory amounts of one table edition, in whole currency units.
///
/// Calculators only see this trait, so a new edition is a new set of data
/// rather than a new code path.
pub trait NeedTable {
    fn need_for_combined_income(&self, income: Decimal) -> Decimal;
    /// Same tiers as the combined lookup, queried with one parent's income.
    fn need_for_single_income(&self, income: Decimal) -> Decimal;
    fn student_own_household_need(&self) -> Decimal;
    fn child_benefit(&self) -> Decimal;
    fn self_support_standard(&self) -> Decimal;
    /// Lower floor, only for privileged children.
    fn self_support_reduced(&self) -> Decimal;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NeedTier {
    pub ceiling: u32,
    pub need: u32,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table edition {0:?} has no income tiers")]
    NoTiers(String),
    #[error("tier ceilings must be strictly ascending: {previous} then {next}")]
    CeilingOrder { previous: u32, next: u32 },
    #[error("tier needs must not decrease: {previous} then {next}")]
    NeedOrder { previous: u32, next: u32 },
    #[error("invalid table TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TieredNeedTable {
    edition: String,
    student_own_household_need: u32,
    child_benefit: u32,
    self_support_standard: u32,
    self_support_reduced: u32,
    tiers: Vec<NeedTier>,
}

const EDITION_2025_CEILINGS: [u32; 15] = [
    2100, 2500, 2900, 3300, 3700, 4100, 4500, 4900, 5300, 5700, 6400, 7200, 8200, 9700, 11200,
];
const EDITION_2025_NEEDS: [u32; 15] = [
    693, 728, 763, 797, 832, 888, 943, 998, 1054, 1109, 1165, 1220, 1276, 1331, 1386,
];

impl TieredNeedTable {
    pub fn new(
        edition: impl Into<String>,
        tiers: Vec<NeedTier>,
        student_own_household_need: u32,
        child_benefit: u32,
        self_support_standard: u32,
        self_support_reduced: u32,
    ) -> Result<Self, TableError> {
        let table = Self {
            edition: edition.into(),
            student_own_household_need,
            child_benefit,
            self_support_standard,
            self_support_reduced,
            tiers,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn edition_2025() -> Self {
        let tiers = EDITION_2025_CEILINGS
            .iter()
            .zip(EDITION_2025_NEEDS.iter())
            .map(|(&ceiling, &need)| NeedTier { ceiling, need })
            .collect();
        Self {
            edition: "2025".to_string(),
            student_own_household_need: 990,
            child_benefit: 255,
            self_support_standard: 1750,
            self_support_reduced: 1450,
            tiers,
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, TableError> {
        let table: Self = toml::from_str(source)?;
        table.validate()?;
        Ok(table)
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn tiers(&self) -> &[NeedTier] {
        &self.tiers
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.tiers.is_empty() {
            return Err(TableError::NoTiers(self.edition.clone()));
        }
        for pair in self.tiers.windows(2) {
            let (previous, next) = (pair[0], pair[1]);
            if next.ceiling <= previous.ceiling {
                return Err(TableError::CeilingOrder {
                    previous: previous.ceiling,
                    next: next.ceiling,
                });
            }
            if next.need < previous.need {
                return Err(TableError::NeedOrder {
                    previous: previous.need,
                    next: next.need,
                });
            }
        }
        Ok(())
    }

    // Above the top ceiling the top need applies; there is no extrapolation.
    fn lookup(&self, income: Decimal) -> Decimal {
        let income = round_to_unit(income);
        self.tiers
            .iter()
            .find(|tier| income <= Decimal::from(tier.ceiling))
            .or_else(|| self.tiers.last())
            .map_or(Decimal::ZERO, |tier| Decimal::from(tier.need))
    }
}

impl Default for TieredNeedTable {
    fn default() -> Self {
        Self::edition_2025()
    }
}

impl NeedTable for TieredNeedTable {
    fn need_for_combined_income(&self, income: Decimal) -> Decimal {
        self.lookup(income)
    }

    fn need_for_single_income(&self, income: Decimal) -> Decimal {
        self.lookup(income)
    }

    fn student_own_household_need(&self) -> Decimal {
        Decimal::from(self.student_own_household_need)
    }

    fn child_benefit(&self) -> Decimal {
        Decimal::from(self.child_benefit)
    }

    fn self_support_standard(&self) -> Decimal {
        Decimal::from(self.self_support_standard)
    }

    fn self_support_reduced(&self) -> Decimal {
        Decimal::from(self.self_support_reduced)
    }
}
