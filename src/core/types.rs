use rust_decimal::Decimal;
use serde::Serialize;

/// Flat share of net income deducted for job-related expenses.
pub const DEFAULT_JOB_EXPENSE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
/// Voluntary pension is deductible up to this share of gross income.
pub const DEFAULT_PENSION_CAP_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);
/// Children at or above this age lose the privileged status.
pub const PRIVILEGED_AGE_LIMIT: u32 = 21;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResidenceStatus {
    WithFather,
    WithMother,
    OwnHousehold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyHolding {
    Rented {
        rent_income: Decimal,
        operating_costs: Decimal,
        interest: Decimal,
        principal: Decimal,
    },
    OwnerOccupied {
        imputed_rent: Decimal,
        interest: Decimal,
        principal: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParentFinancialProfile {
    pub gross_income: Decimal,
    pub taxes: Decimal,
    pub mandatory_social_security: Decimal,
    pub health_insurance: Decimal,
    pub job_expense_rate: Decimal,
    /// Replaces the rate-based deduction when present, including `Some(0)`.
    pub job_expenses_absolute: Option<Decimal>,
    pub voluntary_pension: Decimal,
    pub pension_cap_rate: Decimal,
    pub tax_refund: Decimal,
    pub other_net_income: Decimal,
    pub properties: Vec<PropertyHolding>,
}

impl Default for ParentFinancialProfile {
    fn default() -> Self {
        Self {
            gross_income: Decimal::ZERO,
            taxes: Decimal::ZERO,
            mandatory_social_security: Decimal::ZERO,
            health_insurance: Decimal::ZERO,
            job_expense_rate: DEFAULT_JOB_EXPENSE_RATE,
            job_expenses_absolute: None,
            voluntary_pension: Decimal::ZERO,
            pension_cap_rate: DEFAULT_PENSION_CAP_RATE,
            tax_refund: Decimal::ZERO,
            other_net_income: Decimal::ZERO,
            properties: Vec::new(),
        }
    }
}

impl ParentFinancialProfile {
    /// Profile for an income that is already net of every deduction.
    pub fn from_net_income(net: Decimal) -> Self {
        Self {
            gross_income: net,
            job_expense_rate: Decimal::ZERO,
            job_expenses_absolute: Some(Decimal::ZERO),
            pension_cap_rate: Decimal::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub name: String,
    pub age: u32,
    pub in_general_schooling: bool,
    pub is_student: bool,
    pub residence: ResidenceStatus,
    pub child_benefit_active: bool,
    pub mini_job_income: Decimal,
}

impl Child {
    pub fn lives_independently(&self) -> bool {
        self.residence == ResidenceStatus::OwnHousehold
    }

    /// Under 21, in general schooling and still living with a parent.
    pub fn is_privileged(&self) -> bool {
        self.age < PRIVILEGED_AGE_LIMIT && self.in_general_schooling && !self.lives_independently()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevantIncomes {
    pub father: Decimal,
    pub mother: Decimal,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildNeedResult {
    pub table_need: Decimal,
    pub benefit: Decimal,
    pub net_after_benefit: Decimal,
    pub contribution: Decimal,
    pub net_after_own_income: Decimal,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSplit {
    pub father_pays: Decimal,
    pub mother_pays: Decimal,
}

impl PaymentSplit {
    pub const ZERO: Self = Self {
        father_pays: Decimal::ZERO,
        mother_pays: Decimal::ZERO,
    };

    pub fn total(self) -> Decimal {
        self.father_pays + self.mother_pays
    }

    /// Part of the net need neither parent covers. Reported, never redistributed.
    pub fn shortfall(self, need: &ChildNeedResult) -> Decimal {
        (need.net_after_own_income - self.total()).max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone)]
pub struct ChildCalculation {
    pub child: Child,
    pub need: ChildNeedResult,
    pub split: PaymentSplit,
    pub reduced_self_support: bool,
}

#[derive(Debug, Clone)]
pub struct CalculationResult {
    pub incomes: RelevantIncomes,
    pub children: Vec<ChildCalculation>,
}
