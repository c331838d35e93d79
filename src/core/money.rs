use rust_decimal::{Decimal, RoundingStrategy};

pub(crate) fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn cents_round_half_away_from_zero() {
        assert_eq!(round_to_cents(dec!(10.005)), dec!(10.01));
        assert_eq!(round_to_cents(dec!(10.004)), dec!(10.00));
        assert_eq!(round_to_cents(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn units_round_half_away_from_zero() {
        assert_eq!(round_to_unit(dec!(2100.5)), dec!(2101));
        assert_eq!(round_to_unit(dec!(2100.49)), dec!(2100));
        assert_eq!(round_to_unit(dec!(-0.5)), dec!(-1));
    }

    #[test]
    fn floor_at_zero_keeps_positive_values() {
        assert_eq!(floor_at_zero(dec!(-3.2)), Decimal::ZERO);
        assert_eq!(floor_at_zero(dec!(3.2)), dec!(3.2));
    }
}
