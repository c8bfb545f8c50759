use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Anything that carries a piecework value.
pub trait LineValue {
    fn quantity(&self) -> u32;
    fn unit_price(&self) -> f64;
    fn bonus_amount(&self) -> f64;

    /// `quantity * unit_price + bonus_amount`
    fn value(&self) -> f64 {
        line_value(self.quantity(), self.unit_price(), self.bonus_amount())
    }
}

pub fn line_value(quantity: u32, unit_price: f64, bonus_amount: f64) -> f64 {
    f64::from(quantity) * unit_price + bonus_amount
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct Totals {
    /// Number of line items in the group
    pub count: u64,
    /// Sum of item quantities
    pub quantity: u64,
    pub total_value: f64,
}

impl Totals {
    pub fn add<T: LineValue + ?Sized>(&mut self, item: &T) {
        self.count += 1;
        self.quantity += u64::from(item.quantity());
        self.total_value += item.value();
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_value / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<K> {
    pub key: K,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Line items reduced per key.
#[derive(Debug, Clone)]
pub struct Aggregation<K> {
    groups: BTreeMap<K, Totals>,
}

impl<K: Ord + Clone> Aggregation<K> {
    /// Groups `items` by `key`. Items for which `key` yields `None` are skipped.
    pub fn build<'a, T, I, F>(items: I, key: F) -> Self
    where
        T: LineValue + 'a,
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> Option<K>,
    {
        let mut groups: BTreeMap<K, Totals> = BTreeMap::new();
        for item in items {
            if let Some(k) = key(item) {
                groups.entry(k).or_default().add(item);
            }
        }
        Self { groups }
    }

    pub fn get(&self, key: &K) -> Option<&Totals> {
        self.groups.get(key)
    }

    /// Highest total first, ties broken by ascending key.
    pub fn ranked(&self) -> Vec<Group<K>> {
        let mut out = self.chronological();
        out.sort_by(|a, b| b.totals.total_value.total_cmp(&a.totals.total_value));
        out
    }

    /// Ascending key order.
    pub fn chronological(&self) -> Vec<Group<K>> {
        self.groups
            .iter()
            .map(|(k, t)| Group {
                key: k.clone(),
                totals: *t,
            })
            .collect()
    }
}

/// Totals over a whole slice, no grouping.
pub fn summarize<'a, T, I>(items: I) -> Totals
where
    T: LineValue + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().fold(Totals::default(), |mut acc, item| {
        acc.add(item);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Item {
        worker: Option<u64>,
        day: NaiveDate,
        qty: u32,
        price: f64,
        bonus: f64,
    }

    impl LineValue for Item {
        fn quantity(&self) -> u32 {
            self.qty
        }
        fn unit_price(&self) -> f64 {
            self.price
        }
        fn bonus_amount(&self) -> f64 {
            self.bonus
        }
    }

    fn item(worker: Option<u64>, day: u32, qty: u32, price: f64, bonus: f64) -> Item {
        Item {
            worker,
            day: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            qty,
            price,
            bonus,
        }
    }

    #[test]
    fn value_includes_bonus() {
        assert_eq!(item(None, 1, 0, 1000.0, 0.0).value(), 0.0);
        assert_eq!(item(None, 1, 0, 1000.0, 150.0).value(), 150.0);
        assert_eq!(item(None, 1, 4, 250.0, 0.0).value(), 1000.0);
        assert_eq!(
            item(None, 1, u32::MAX, 1000.0, 0.0).value(),
            u32::MAX as f64 * 1000.0
        );
    }

    #[test]
    fn worker_totals_match_worked_example() {
        let items = vec![
            item(Some(1), 1, 2, 1000.0, 0.0),
            item(Some(1), 2, 1, 500.0, 200.0),
            item(Some(1), 3, 3, 300.0, 0.0),
        ];
        let agg = Aggregation::build(&items, |i| i.worker);
        let totals = agg.get(&1).unwrap();
        assert_eq!(totals.count, 3);
        assert_eq!(totals.quantity, 6);
        assert_eq!(totals.total_value, 3600.0);
        assert_eq!(totals.average(), 1200.0);
    }

    #[test]
    fn unassigned_items_are_skipped_and_totals_are_conserved() {
        let items = vec![
            item(Some(1), 1, 2, 100.0, 10.0),
            item(Some(2), 1, 5, 40.0, 0.0),
            item(None, 2, 9, 999.0, 0.0),
            item(Some(2), 3, 1, 30.0, 5.0),
            item(Some(3), 4, 0, 80.0, 0.0),
        ];
        let agg = Aggregation::build(&items, |i| i.worker);
        assert_eq!(agg.ranked().len(), 3);

        let assigned: f64 = items
            .iter()
            .filter(|i| i.worker.is_some())
            .map(LineValue::value)
            .sum();
        let grouped: f64 = agg.ranked().iter().map(|g| g.totals.total_value).sum();
        assert_eq!(grouped, assigned);
        let counted: u64 = agg.chronological().iter().map(|g| g.totals.count).sum();
        assert_eq!(counted, 4);
    }

    #[test]
    fn ranked_is_descending_and_chronological_is_by_key() {
        let items = vec![
            item(Some(1), 5, 1, 10.0, 0.0),
            item(Some(2), 1, 1, 50.0, 0.0),
            item(Some(3), 3, 1, 30.0, 0.0),
        ];
        let by_day = Aggregation::build(&items, |i| Some(i.day));
        let days: Vec<u32> = by_day
            .chronological()
            .iter()
            .map(|g| chrono::Datelike::day(&g.key))
            .collect();
        assert_eq!(days, vec![1, 3, 5]);

        let by_worker = Aggregation::build(&items, |i| i.worker);
        let order: Vec<u64> = by_worker.ranked().iter().map(|g| g.key).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn empty_input_gives_empty_aggregation() {
        let items: Vec<Item> = Vec::new();
        let agg = Aggregation::build(&items, |i| i.worker);
        assert!(agg.ranked().is_empty());
        assert_eq!(agg.get(&1), None);
        assert_eq!(Totals::default().average(), 0.0);
        assert_eq!(summarize(&items), Totals::default());
    }
}
