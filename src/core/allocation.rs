//! Greedy, order-preserving distribution of available cash over the item tree.
//!
//! List order is priority order: earlier siblings claim cash first. Groups
//! are walked children-first and then compete for the remaining pool with
//! their own rolled-up sum, so a group's cost is drawn once through its
//! children and once more at the group's own position.
//!
//! Sums saturate at `i64::MAX`, so recalculation never fails.

use tracing::debug;

use crate::domain::common::div_ceil;
use crate::domain::{Importance, Item, ItemDerived, WishList, WishListTotals};

/// Cash state threaded through the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashPool {
    pub remaining: i64,
    pub refill: i64,
}

/// Selection, in-cart and count aggregates of one sibling list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Rollup {
    max_importance: Importance,
    any_selected: bool,
    any_in_cart: bool,
    selected_sum: i64,
    selected_count: usize,
    in_cart_sum: i64,
    in_cart_count: usize,
    node_count: usize,
    checked_count: usize,
}

impl Rollup {
    fn absorb(&mut self, item: &Item, children: &Rollup) {
        let sum = item.derived.sum;
        self.node_count += 1 + children.node_count;
        self.checked_count += usize::from(item.selected) + children.checked_count;
        self.max_importance = self
            .max_importance
            .max(item.importance)
            .max(children.max_importance);
        self.any_selected |= item.selected || children.any_selected;
        self.any_in_cart |= item.incart || children.any_in_cart;

        if item.selected {
            self.selected_sum = self.selected_sum.saturating_add(sum);
            self.selected_count += 1;
        } else {
            self.selected_sum = self.selected_sum.saturating_add(children.selected_sum);
            self.selected_count += children.selected_count;
        }

        if item.incart {
            self.in_cart_sum = self.in_cart_sum.saturating_add(sum);
            self.in_cart_count += 1;
        } else {
            self.in_cart_sum = self.in_cart_sum.saturating_add(children.in_cart_sum);
            self.in_cart_count += children.in_cart_count;
        }
    }
}

/// Stateless recalculation entry point.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Recomputes every derived field of `list` and stores the totals on it.
    ///
    /// Deterministic: unchanged inputs always yield identical output.
    pub fn recalculate(list: &mut WishList) -> WishListTotals {
        let pool = CashPool {
            remaining: list.total_cash,
            refill: list.refill_cash,
        };
        let (pool, rollup) = allocate_level(&mut list.items, pool);

        let totals = WishListTotals {
            total_remain: pool.remaining.max(0),
            selected_sum: rollup.selected_sum,
            selected_count: rollup.selected_count,
            in_cart_sum: rollup.in_cart_sum,
            in_cart_count: rollup.in_cart_count,
            item_count: rollup.node_count,
            checked_count: rollup.checked_count,
        };
        list.totals = totals;

        debug!(
            total_cash = list.total_cash,
            refill_cash = list.refill_cash,
            remain = totals.total_remain,
            items = totals.item_count,
            "wish list recalculated"
        );
        totals
    }
}

/// Allocates one sibling list. The shortfall accumulator is local to the
/// list; the cash pool is shared with the caller.
fn allocate_level(items: &mut [Item], mut pool: CashPool) -> (CashPool, Rollup) {
    let mut total_need_cash = 0;
    let mut level = Rollup::default();

    for item in items.iter_mut() {
        let mut children = Rollup::default();
        if item.is_group() {
            let (next, rollup) = allocate_level(&mut item.children, pool);
            pool = next;
            children = rollup;
            item.cost = item
                .children
                .iter()
                .map(|child| child.derived.sum)
                .fold(0, i64::saturating_add);
        }

        item.derived = ItemDerived {
            sum: item.sum(),
            children_importance: children.max_importance,
            children_selected: children.any_selected,
            children_in_cart: children.any_in_cart,
            ..ItemDerived::default()
        };
        pool = allocate_item(item, pool, &mut total_need_cash);
        level.absorb(item, &children);
    }

    (pool, level)
}

fn allocate_item(item: &mut Item, mut pool: CashPool, total_need_cash: &mut i64) -> CashPool {
    let settled = item.is_settled();
    let derived = &mut item.derived;
    let sum = derived.sum;

    if sum <= 0 {
        derived.need_cash = None;
        derived.need_total = None;
        derived.avail_cash = None;
        derived.need_months = None;
        return pool;
    }

    if settled {
        derived.need_cash = Some(0);
        derived.need_total = Some(0);
        derived.avail_cash = Some(sum);
        derived.need_months = covered_months(pool.refill);
        return pool;
    }

    let (need, avail) = if pool.remaining >= sum {
        pool.remaining -= sum;
        (0, sum)
    } else if pool.remaining > 0 {
        let avail = pool.remaining;
        pool.remaining = 0;
        (sum - avail, avail)
    } else {
        (sum, 0)
    };

    derived.need_cash = Some(need);
    derived.avail_cash = Some(avail);

    if need > 0 {
        *total_need_cash = total_need_cash.saturating_add(need);
        derived.need_total = Some(*total_need_cash);
        derived.need_months = months_to_cover(*total_need_cash, pool.refill);
    } else {
        derived.need_total = Some(0);
        derived.need_months = covered_months(pool.refill);
    }

    pool
}

/// Months of refill needed to close `shortfall`; `None` without a refill plan.
pub fn months_to_cover(shortfall: i64, refill: i64) -> Option<i64> {
    (refill > 0).then(|| div_ceil(shortfall, refill))
}

fn covered_months(refill: i64) -> Option<i64> {
    (refill > 0).then_some(0)
}
