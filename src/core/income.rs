use rust_decimal::Decimal;

use super::money::floor_at_zero;
use super::types::{ParentFinancialProfile, PropertyHolding, RelevantIncomes};

/// Monthly income that counts for support purposes.
///
/// The result is signed on purpose: loss-making rentals can push it below
/// zero and callers clamp wherever they need an available amount.
pub fn relevant_income(profile: &ParentFinancialProfile) -> Decimal {
    let mut net = profile.gross_income
        - profile.taxes
        - profile.mandatory_social_security
        - profile.health_insurance;

    let job_costs = profile
        .job_expenses_absolute
        .unwrap_or(net * profile.job_expense_rate);
    net -= job_costs;

    net += profile.properties.iter().map(property_delta).sum::<Decimal>();
    net += profile.tax_refund + profile.other_net_income;
    net -= pension_deduction(profile);
    net
}

pub fn relevant_incomes(
    father: &ParentFinancialProfile,
    mother: &ParentFinancialProfile,
) -> RelevantIncomes {
    RelevantIncomes {
        father: relevant_income(father),
        mother: relevant_income(mother),
    }
}

pub fn property_delta(holding: &PropertyHolding) -> Decimal {
    match *holding {
        PropertyHolding::Rented {
            rent_income,
            operating_costs,
            interest,
            principal,
        } => (rent_income - operating_costs) - (interest + principal),
        PropertyHolding::OwnerOccupied {
            imputed_rent,
            interest,
            principal,
        } => {
            let costs = (interest + principal).min(imputed_rent);
            floor_at_zero(imputed_rent - costs)
        }
    }
}

fn pension_deduction(profile: &ParentFinancialProfile) -> Decimal {
    let cap = profile.gross_income * profile.pension_cap_rate;
    profile.voluntary_pension.min(cap)
}
