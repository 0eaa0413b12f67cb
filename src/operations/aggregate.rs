use rust_decimal::Decimal;
use std::collections::HashMap;

/// Sums `value` per `key`. Largest total first, ties by name. Totals
/// saturate at the `Decimal` bounds instead of panicking.
pub fn totals_by<T, K, V>(items: &[T], key: K, value: V) -> Vec<(String, Decimal)>
where
    K: Fn(&T) -> &str,
    V: Fn(&T) -> Decimal,
{
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for item in items {
        let total = totals.entry(key(item)).or_insert(Decimal::ZERO);
        *total = total.saturating_add(value(item));
    }

    let mut totals: Vec<(String, Decimal)> = totals
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
}

pub fn grand_total<'a, I>(totals: I) -> Decimal
where
    I: IntoIterator<Item = &'a Decimal>,
{
    totals.into_iter().fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_by_sorts_descending_then_by_name() {
        let items = vec![("b", 5), ("a", 5), ("c", 1), ("c", 9)];
        let totals = totals_by(&items, |i| i.0, |i| Decimal::from(i.1));

        assert_eq!(
            totals,
            vec![
                ("c".to_string(), Decimal::from(10)),
                ("a".to_string(), Decimal::from(5)),
                ("b".to_string(), Decimal::from(5)),
            ]
        );
    }

    #[test]
    fn test_totals_by_saturates_instead_of_overflowing() {
        let items = vec![("a", Decimal::MAX), ("a", Decimal::MAX), ("b", Decimal::MIN)];
        let totals = totals_by(&items, |i| i.0, |i| i.1);

        assert_eq!(totals[0], ("a".to_string(), Decimal::MAX));
        assert_eq!(totals[1], ("b".to_string(), Decimal::MIN));
        assert_eq!(grand_total(&vec![Decimal::MAX, Decimal::ONE]), Decimal::MAX);
    }

    #[test]
    fn test_totals_by_empty_input() {
        let items: Vec<(&str, i64)> = Vec::new();
        assert!(totals_by(&items, |i| i.0, |i| Decimal::from(i.1)).is_empty());
        assert_eq!(grand_total(&Vec::<Decimal>::new()), Decimal::ZERO);
    }
}
