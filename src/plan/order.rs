//! Operator-supplied display order per repository

use crate::plan::build::RepositoryPlan;
use crate::types::PullRequestRecord;
use std::collections::HashMap;

/// Manual merge order, keyed by repository name
///
/// Values are PR numbers, not ids. They may name pull requests that are no
/// longer in the plan; those are skipped when the order is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualOrder {
    orders: HashMap<String, Vec<u64>>,
}

impl ManualOrder {
    /// Create an empty order
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored order for `repository`. An empty list clears it.
    pub fn set(&mut self, repository: impl Into<String>, numbers: Vec<u64>) {
        let repository = repository.into();
        if numbers.is_empty() {
            self.orders.remove(&repository);
        } else {
            self.orders.insert(repository, numbers);
        }
    }

    /// Stored order for `repository`, if any
    pub fn get(&self, repository: &str) -> Option<&[u64]> {
        self.orders.get(repository).map(Vec::as_slice)
    }

    /// Order a repository's records.
    ///
    /// Records named by the stored order come first, in that order and each
    /// at most once. The rest follow in natural order.
    pub fn apply<'a>(&self, plan: &'a RepositoryPlan) -> Vec<&'a PullRequestRecord> {
        let mut remaining: Vec<&PullRequestRecord> = plan.records().iter().collect();
        let Some(numbers) = self.orders.get(&plan.name) else {
            return remaining;
        };

        let mut ordered = Vec::with_capacity(remaining.len());
        for number in numbers {
            if let Some(pos) = remaining.iter().position(|r| r.number == *number) {
                ordered.push(remaining.remove(pos));
            }
        }
        ordered.extend(remaining);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::CommitStatus;
    use crate::types::PrState;

    fn plan_with(name: &str, numbers: &[u64]) -> RepositoryPlan {
        let mut plan = RepositoryPlan::new(name);
        for &number in numbers {
            plan.insert(PullRequestRecord {
                id: number * 1000,
                number,
                title: format!("PR {number}"),
                state: PrState::Open,
                mergeable: Some(true),
                merged: false,
                url: format!("https://github.com/acme/{name}/pull/{number}"),
                commit_status: CommitStatus::Success,
            });
        }
        plan
    }

    fn numbers(records: &[&PullRequestRecord]) -> Vec<u64> {
        records.iter().map(|r| r.number).collect()
    }

    #[test]
    fn test_no_order_keeps_natural_order() {
        let plan = plan_with("api", &[5, 2, 9]);
        let order = ManualOrder::new();
        assert_eq!(numbers(&order.apply(&plan)), vec![5, 2, 9]);
    }

    #[test]
    fn test_ordered_prefix_then_rest() {
        let plan = plan_with("api", &[1, 2, 3]);
        let mut order = ManualOrder::new();
        order.set("api", vec![3, 1]);
        assert_eq!(numbers(&order.apply(&plan)), vec![3, 1, 2]);
    }

    #[test]
    fn test_missing_numbers_are_skipped() {
        let plan = plan_with("api", &[1, 2, 3]);
        let mut order = ManualOrder::new();
        order.set("api", vec![99, 2]);
        assert_eq!(numbers(&order.apply(&plan)), vec![2, 1, 3]);
    }

    #[test]
    fn test_duplicate_numbers_emit_once() {
        let plan = plan_with("api", &[1, 2]);
        let mut order = ManualOrder::new();
        order.set("api", vec![2, 2, 1]);
        assert_eq!(numbers(&order.apply(&plan)), vec![2, 1]);
    }

    #[test]
    fn test_set_replaces_previous_order() {
        let plan = plan_with("api", &[1, 2, 3]);
        let mut order = ManualOrder::new();
        order.set("api", vec![3, 2]);
        order.set("api", vec![2]);
        assert_eq!(order.get("api"), Some(&[2][..]));
        assert_eq!(numbers(&order.apply(&plan)), vec![2, 1, 3]);
    }

    #[test]
    fn test_empty_order_clears() {
        let mut order = ManualOrder::new();
        order.set("api", vec![2]);
        order.set("api", vec![]);
        assert!(order.get("api").is_none());
    }

    #[test]
    fn test_orders_are_scoped_per_repository() {
        let api = plan_with("api", &[1, 2]);
        let web = plan_with("web", &[1, 2]);
        let mut order = ManualOrder::new();
        order.set("web", vec![2]);
        assert_eq!(numbers(&order.apply(&api)), vec![1, 2]);
        assert_eq!(numbers(&order.apply(&web)), vec![2, 1]);
    }
}
