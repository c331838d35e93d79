use rust_decimal::Decimal;

use super::money::{floor_at_zero, round_to_cents};
use super::table::NeedTable;
use super::types::{ChildNeedResult, PaymentSplit};

/// Divides the net need by each parent's income above the self-support floor.
///
/// Each share is then capped at what that parent would owe on their own
/// income alone. A capped share is not topped up by the other parent, so the
/// two shares can add up to less than the need.
pub fn split_liability<T: NeedTable + ?Sized>(
    table: &T,
    need: &ChildNeedResult,
    father_income: Decimal,
    mother_income: Decimal,
    reduced_self_support: bool,
) -> PaymentSplit {
    let self_support = if reduced_self_support {
        table.self_support_reduced()
    } else {
        table.self_support_standard()
    };

    let father_available = floor_at_zero(father_income - self_support);
    let mother_available = floor_at_zero(mother_income - self_support);
    let total_available = father_available + mother_available;
    if total_available.is_zero() {
        return PaymentSplit::ZERO;
    }

    // Quotes stay within 0..=1, so the product is bounded by the net need.
    let father_quote = father_available / total_available;
    let mother_quote = mother_available / total_available;
    let father_raw = round_to_cents(need.net_after_own_income * father_quote);
    let mother_raw = round_to_cents(need.net_after_own_income * mother_quote);

    PaymentSplit {
        father_pays: father_raw.min(solo_liability(table, need, father_income)),
        mother_pays: mother_raw.min(solo_liability(table, need, mother_income)),
    }
}

/// Most a parent can owe, as if their income were the only one.
pub fn solo_liability<T: NeedTable + ?Sized>(
    table: &T,
    need: &ChildNeedResult,
    parent_income: Decimal,
) -> Decimal {
    let solo_need = table.need_for_single_income(parent_income);
    floor_at_zero(solo_need - need.benefit - need.contribution)
}
