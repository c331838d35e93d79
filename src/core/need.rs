use rust_decimal::Decimal;

use super::money::floor_at_zero;
use super::table::NeedTable;
use super::types::{Child, ChildNeedResult};

/// Part of a pupil's or student's own earnings that stays with the child.
pub const EARNINGS_ALLOWANCE: Decimal = Decimal::ONE_HUNDRED;

pub fn resolve_child_need<T: NeedTable + ?Sized>(
    table: &T,
    child: &Child,
    father_income: Decimal,
    mother_income: Decimal,
) -> ChildNeedResult {
    let table_need = if child.is_student && child.lives_independently() {
        table.student_own_household_need()
    } else {
        table.need_for_combined_income(father_income + mother_income)
    };

    let benefit = if child.child_benefit_active {
        table.child_benefit()
    } else {
        Decimal::ZERO
    };
    let net_after_benefit = floor_at_zero(table_need - benefit);

    let contribution = own_income_contribution(child);
    let net_after_own_income = floor_at_zero(net_after_benefit - contribution);

    ChildNeedResult {
        table_need,
        benefit,
        net_after_benefit,
        contribution,
        net_after_own_income,
    }
}

/// Not capped by the remaining need; the need floor absorbs any excess.
pub fn own_income_contribution(child: &Child) -> Decimal {
    if child.mini_job_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let allowance = if child.in_general_schooling || child.is_student {
        EARNINGS_ALLOWANCE
    } else {
        Decimal::ZERO
    };
    floor_at_zero(child.mini_job_income - allowance)
}
