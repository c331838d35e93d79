use tracing::debug;

use super::income::relevant_incomes;
use super::need::resolve_child_need;
use super::split::split_liability;
use super::table::NeedTable;
use super::types::{CalculationResult, Child, ChildCalculation, ParentFinancialProfile};

/// Runs the whole calculation for one household.
///
/// Children keep their input order. Privileged children are measured against
/// the reduced self-support floor.
pub fn calculate<T: NeedTable + ?Sized>(
    table: &T,
    father: &ParentFinancialProfile,
    mother: &ParentFinancialProfile,
    children: &[Child],
) -> CalculationResult {
    let incomes = relevant_incomes(father, mother);
    debug!(
        father = %incomes.father,
        mother = %incomes.mother,
        "relevant incomes"
    );

    let children = children
        .iter()
        .map(|child| {
            let reduced_self_support = child.is_privileged();
            let need = resolve_child_need(table, child, incomes.father, incomes.mother);
            let split = split_liability(
                table,
                &need,
                incomes.father,
                incomes.mother,
                reduced_self_support,
            );
            debug!(
                child = %child.name,
                net_need = %need.net_after_own_income,
                father_pays = %split.father_pays,
                mother_pays = %split.mother_pays,
                reduced_self_support,
                "child calculated"
            );
            ChildCalculation {
                child: child.clone(),
                need,
                split,
                reduced_self_support,
            }
        })
        .collect();

    CalculationResult { incomes, children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::TieredNeedTable;
    use crate::core::types::{PaymentSplit, PropertyHolding, ResidenceStatus};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn child(name: &str) -> Child {
        Child {
            name: name.to_string(),
            age: 19,
            in_general_schooling: false,
            is_student: false,
            residence: ResidenceStatus::WithMother,
            child_benefit_active: true,
            mini_job_income: Decimal::ZERO,
        }
    }

    fn father() -> ParentFinancialProfile {
        ParentFinancialProfile {
            gross_income: dec!(5200),
            taxes: dec!(900),
            mandatory_social_security: dec!(520),
            health_insurance: dec!(430),
            job_expenses_absolute: Some(dec!(150)),
            properties: vec![PropertyHolding::OwnerOccupied {
                imputed_rent: dec!(900),
                interest: dec!(350),
                principal: dec!(250),
            }],
            ..ParentFinancialProfile::default()
        }
    }

    #[test]
    fn household_with_two_children_keeps_order() {
        let table = TieredNeedTable::edition_2025();
        let mother = ParentFinancialProfile::from_net_income(dec!(2250));
        let mut student = child("Ben");
        student.is_student = true;
        student.residence = ResidenceStatus::OwnHousehold;
        student.mini_job_income = dec!(350);

        let result = calculate(&table, &father(), &mother, &[child("Anna"), student]);

        // 5200 - 1850 - 150 + 300 = 3500.
        assert_eq!(result.incomes.father, dec!(3500));
        assert_eq!(result.incomes.mother, dec!(2250));
        assert_eq!(result.children.len(), 2);

        let anna = &result.children[0];
        assert_eq!(anna.child.name, "Anna");
        // Combined 5750 -> 1165 - 255 = 910; available 1750 and 500.
        assert_eq!(anna.need.net_after_own_income, dec!(910));
        assert!(!anna.reduced_self_support);
        // Raw 707.78 / 202.22; caps 832 - 255 = 577 and 728 - 255 = 473.
        assert_eq!(
            anna.split,
            PaymentSplit {
                father_pays: dec!(577),
                mother_pays: dec!(202.22),
            }
        );

        let ben = &result.children[1];
        assert_eq!(ben.need.table_need, dec!(990));
        assert_eq!(ben.need.contribution, dec!(250));
        assert_eq!(ben.need.net_after_own_income, dec!(485));
    }

    #[test]
    fn privileged_child_uses_reduced_self_support() {
        let table = TieredNeedTable::edition_2025();
        let father = ParentFinancialProfile::from_net_income(dec!(1700));
        let mother = ParentFinancialProfile::from_net_income(dec!(1000));
        let mut pupil = child("Clara");
        pupil.age = 18;
        pupil.in_general_schooling = true;

        let result = calculate(&table, &father, &mother, &[pupil, child("Dora")]);
        let clara = &result.children[0];
        assert!(clara.reduced_self_support);
        assert_eq!(clara.split.father_pays, dec!(438));

        let dora = &result.children[1];
        assert!(!dora.reduced_self_support);
        assert_eq!(dora.split, PaymentSplit::ZERO);
        // Combined 2700 -> 763 - 255 = 508, none of it covered.
        assert_eq!(dora.split.shortfall(&dora.need), dec!(508));
    }

    #[test]
    fn no_children_yields_only_incomes() {
        let table = TieredNeedTable::edition_2025();
        let result = calculate(
            &table,
            &ParentFinancialProfile::from_net_income(dec!(2000)),
            &ParentFinancialProfile::from_net_income(dec!(3000)),
            &[],
        );
        assert!(result.children.is_empty());
        assert_eq!(result.incomes.mother, dec!(3000));
    }

    #[test]
    fn huge_net_income_completes_without_panicking() {
        let table = TieredNeedTable::edition_2025();
        let father = ParentFinancialProfile::from_net_income(dec!(1000000000000000000000000000));
        let mother = ParentFinancialProfile::from_net_income(dec!(2250));

        let result = calculate(&table, &father, &mother, &[child("Anna")]);
        let anna = &result.children[0];
        assert_eq!(anna.need.table_need, dec!(1386));
        assert_eq!(anna.split.father_pays, dec!(1131));
        assert_eq!(anna.split.mother_pays, Decimal::ZERO);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_every_child_gets_bounded_non_negative_shares(
            father_net in -100_000i64..1_500_000,
            mother_net in -100_000i64..1_500_000,
            mini_job in 0i64..80_000,
            age in 16u32..27
        ) {
            let table = TieredNeedTable::edition_2025();
            let father = ParentFinancialProfile::from_net_income(Decimal::new(father_net, 2));
            let mother = ParentFinancialProfile::from_net_income(Decimal::new(mother_net, 2));
            let mut first = child("first");
            first.age = age;
            first.in_general_schooling = true;
            first.mini_job_income = Decimal::new(mini_job, 2);
            let second = child("second");

            let result = calculate(&table, &father, &mother, &[first, second]);
            prop_assert_eq!(result.children.len(), 2);
            prop_assert_eq!(result.children[0].reduced_self_support, age < 21);
            for calc in &result.children {
                prop_assert!(calc.split.father_pays >= Decimal::ZERO);
                prop_assert!(calc.split.mother_pays >= Decimal::ZERO);
                prop_assert!(calc.split.shortfall(&calc.need) >= Decimal::ZERO);
            }
        }
    }
}
