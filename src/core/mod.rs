mod engine;
mod income;
mod money;
mod need;
mod split;
mod table;
mod types;

pub use engine::calculate;
pub use income::{property_delta, relevant_income, relevant_incomes};
pub use need::{EARNINGS_ALLOWANCE, own_income_contribution, resolve_child_need};
pub use split::{solo_liability, split_liability};
pub use table::{NeedTable, NeedTier, TableError, TieredNeedTable};
pub use types::{
    CalculationResult, Child, ChildCalculation, ChildNeedResult, DEFAULT_JOB_EXPENSE_RATE,
    DEFAULT_PENSION_CAP_RATE, PRIVILEGED_AGE_LIMIT, ParentFinancialProfile, PaymentSplit,
    PropertyHolding, RelevantIncomes, ResidenceStatus,
};
