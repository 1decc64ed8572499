//! The root aggregate: the top-level item list plus cash settings.

use crate::domain::common::ItemId;
use crate::domain::item::Item;

/// Aggregates produced by the last recalculation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WishListTotals {
    /// Cash left after every affordable item was covered, never negative.
    pub total_remain: i64,
    pub selected_sum: i64,
    pub selected_count: usize,
    pub in_cart_sum: i64,
    pub in_cart_count: usize,
    /// Number of nodes in the whole tree.
    pub item_count: usize,
    /// Number of nodes carrying the check mark.
    pub checked_count: usize,
}

/// Tri-state value of a "select all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    None,
    Some,
    All,
}

impl WishListTotals {
    pub fn check_state(&self) -> CheckState {
        if self.checked_count == 0 {
            CheckState::None
        } else if self.checked_count >= self.item_count {
            CheckState::All
        } else {
            CheckState::Some
        }
    }
}

/// Position of a node: indices from the root list down to the node.
pub type ItemPath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WishList {
    pub items: Vec<Item>,
    /// Funds available right now.
    pub total_cash: i64,
    /// Planned monthly addition to the funds; 0 disables projections.
    pub refill_cash: i64,
    pub comment: String,
    pub totals: WishListTotals,
}

impl WishList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cash(total_cash: i64, refill_cash: i64) -> Self {
        Self {
            total_cash: total_cash.max(0),
            refill_cash: refill_cash.max(0),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_total_cash(&mut self, cash: i64) {
        self.total_cash = cash.max(0);
    }

    pub fn set_refill_cash(&mut self, cash: i64) {
        self.refill_cash = cash.max(0);
    }

    /// Adds one month of refill to the available cash.
    pub fn apply_refill(&mut self) -> bool {
        if self.refill_cash > 0 {
            self.total_cash = self.total_cash.saturating_add(self.refill_cash);
            true
        } else {
            false
        }
    }

    pub fn path_of(&self, id: ItemId) -> Option<ItemPath> {
        fn search(items: &[Item], id: ItemId, path: &mut ItemPath) -> bool {
            for (index, item) in items.iter().enumerate() {
                path.push(index);
                if item.id == id || search(&item.children, id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        search(&self.items, id, &mut path).then_some(path)
    }

    pub fn item_at(&self, path: &[usize]) -> Option<&Item> {
        let (first, rest) = path.split_first()?;
        let mut current = self.items.get(*first)?;
        for index in rest {
            current = current.children.get(*index)?;
        }
        Some(current)
    }

    pub fn item_at_mut(&mut self, path: &[usize]) -> Option<&mut Item> {
        let (first, rest) = path.split_first()?;
        let mut current = self.items.get_mut(*first)?;
        for index in rest {
            current = current.children.get_mut(*index)?;
        }
        Some(current)
    }

    /// The list holding the children of `parent`, or the root list for an
    /// empty path.
    pub fn children_at_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<Item>> {
        if parent.is_empty() {
            Some(&mut self.items)
        } else {
            self.item_at_mut(parent).map(|item| &mut item.children)
        }
    }

    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.path_of(id).and_then(|path| self.item_at(&path))
    }

    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let path = self.path_of(id)?;
        self.item_at_mut(&path)
    }

    /// Identifier of the parent node, `None` for top-level items and unknown ids.
    pub fn parent_of(&self, id: ItemId) -> Option<ItemId> {
        let path = self.path_of(id)?;
        let parent = &path[..path.len() - 1];
        if parent.is_empty() {
            None
        } else {
            self.item_at(parent).map(|item| item.id)
        }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.items.iter().map(Item::node_count).sum()
    }

    /// Deepest nesting level, 0 for an empty list.
    pub fn depth(&self) -> usize {
        self.items.iter().map(Item::depth).max().unwrap_or(0)
    }

    /// Visits every node in pre-order together with its nesting level.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&Item, usize),
    {
        fn walk<F: FnMut(&Item, usize)>(items: &[Item], level: usize, visitor: &mut F) {
            for item in items {
                visitor(item, level);
                walk(&item.children, level + 1, visitor);
            }
        }
        walk(&self.items, 0, &mut visitor);
    }

    /// Mutable pre-order traversal.
    pub fn visit_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut Item),
    {
        fn walk<F: FnMut(&mut Item)>(items: &mut [Item], visitor: &mut F) {
            for item in items {
                visitor(item);
                walk(&mut item.children, visitor);
            }
        }
        walk(&mut self.items, &mut visitor);
    }

    /// Compares the persisted subset of two lists.
    pub fn same_content(&self, other: &WishList) -> bool {
        self.total_cash == other.total_cash
            && self.refill_cash == other.refill_cash
            && self.comment == other.comment
            && self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(left, right)| left.same_content(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (WishList, ItemId, ItemId) {
        let nested = Item::new("Lens", 300);
        let nested_id = nested.id;
        let group = Item::group("Camera kit", vec![Item::new("Body", 700), nested]);
        let group_id = group.id;
        let mut list = WishList::with_cash(100, 10);
        list.items = vec![Item::new("Book", 20), group];
        (list, group_id, nested_id)
    }

    #[test]
    fn path_lookup_finds_nested_nodes() {
        let (list, group_id, nested_id) = sample();
        assert_eq!(list.path_of(nested_id), Some(vec![1, 1]));
        assert_eq!(list.find(nested_id).map(|i| i.name.as_str()), Some("Lens"));
        assert_eq!(list.parent_of(nested_id), Some(group_id));
        assert_eq!(list.parent_of(group_id), None);
        assert!(list.path_of(ItemId::new_v4()).is_none());
    }

    #[test]
    fn visit_reports_levels_in_pre_order() {
        let (list, _, _) = sample();
        let mut seen = Vec::new();
        list.visit(|item, level| seen.push((item.name.clone(), level)));
        assert_eq!(
            seen,
            vec![
                ("Book".to_string(), 0),
                ("Camera kit".to_string(), 0),
                ("Body".to_string(), 1),
                ("Lens".to_string(), 1),
            ]
        );
        assert_eq!(list.node_count(), 4);
        assert_eq!(list.depth(), 2);
    }

    #[test]
    fn refill_only_applies_when_configured() {
        let mut list = WishList::with_cash(50, 0);
        assert!(!list.apply_refill());
        list.set_refill_cash(25);
        assert!(list.apply_refill());
        assert_eq!(list.total_cash, 75);
    }

    #[test]
    fn check_state_follows_counts() {
        let mut totals = WishListTotals {
            item_count: 3,
            ..WishListTotals::default()
        };
        assert_eq!(totals.check_state(), CheckState::None);
        totals.checked_count = 1;
        assert_eq!(totals.check_state(), CheckState::Some);
        totals.checked_count = 3;
        assert_eq!(totals.check_state(), CheckState::All);
    }
}
