//! Wish-list items: single products (leaves) and groups of sub-items.

use std::fmt;

use uuid::Uuid;

use crate::domain::common::ItemId;

/// User-assigned priority marker of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Importance {
    #[default]
    Unset,
    Low,
    Medium,
    High,
    Highest,
}

impl Importance {
    pub const MIN_LEVEL: i64 = 0;
    pub const MAX_LEVEL: i64 = 4;

    /// Maps a raw level onto the enumeration, clamping out-of-range values.
    pub fn from_level(level: i64) -> Self {
        match level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL) {
            0 => Importance::Unset,
            1 => Importance::Low,
            2 => Importance::Medium,
            3 => Importance::High,
            _ => Importance::Highest,
        }
    }

    pub fn level(self) -> i64 {
        match self {
            Importance::Unset => 0,
            Importance::Low => 1,
            Importance::Medium => 2,
            Importance::High => 3,
            Importance::Highest => 4,
        }
    }

    /// Human-readable label used by exports.
    pub fn label(self) -> &'static str {
        match self {
            Importance::Unset => "",
            Importance::Low => "низкая",
            Importance::Medium => "средняя",
            Importance::High => "высокая",
            Importance::Highest => "наивысшая",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// A link attached to an item: the address plus an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUrl {
    pub address: String,
    pub label: String,
}

impl ItemUrl {
    pub fn new(address: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: label.into(),
        }
    }

    /// Renders `address (label)`, or just the address when the label is empty.
    pub fn display(&self) -> String {
        if self.label.is_empty() {
            self.address.clone()
        } else {
            format!("{} ({})", self.address, self.label)
        }
    }
}

/// Values produced by recalculation. Never persisted.
///
/// `need_cash` is `Some(0)` when the item is covered, `None` when its cost
/// is unknown, and the shortfall otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemDerived {
    pub sum: i64,
    pub need_cash: Option<i64>,
    pub need_total: Option<i64>,
    pub avail_cash: Option<i64>,
    pub need_months: Option<i64>,
    pub children_importance: Importance,
    pub children_selected: bool,
    pub children_in_cart: bool,
}

/// One node of the wish-list tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub cost: i64,
    pub quantity: u32,
    pub info: String,
    pub urls: Vec<ItemUrl>,
    pub importance: Importance,
    pub incart: bool,
    pub paid: bool,
    pub selected: bool,
    pub children: Vec<Item>,
    pub derived: ItemDerived,
}

impl Item {
    pub fn new(name: impl Into<String>, cost: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cost,
            quantity: 1,
            info: String::new(),
            urls: Vec::new(),
            importance: Importance::Unset,
            incart: false,
            paid: false,
            selected: false,
            children: Vec::new(),
            derived: ItemDerived::default(),
        }
    }

    /// Creates an empty group; its cost is computed from the children.
    pub fn group(name: impl Into<String>, children: Vec<Item>) -> Self {
        let mut group = Self::new(name, 0);
        group.children = children;
        group
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_url(mut self, url: ItemUrl) -> Self {
        self.urls.push(url);
        self
    }

    pub fn with_child(mut self, child: Item) -> Self {
        self.children.push(child);
        self
    }

    pub fn in_cart(mut self, paid: bool) -> Self {
        self.set_in_cart(true);
        self.set_paid(paid);
        self
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// `cost * quantity` for a positive cost, otherwise 0. Saturates at
    /// `i64::MAX`.
    pub fn sum(&self) -> i64 {
        line_sum(self.cost, self.quantity)
    }

    /// Like [`Item::sum`], but computes group costs from the children
    /// instead of trusting the last recalculation.
    pub fn rolled_up_sum(&self) -> i64 {
        if !self.is_group() {
            return self.sum();
        }
        let cost = self
            .children
            .iter()
            .map(Item::rolled_up_sum)
            .fold(0, i64::saturating_add);
        line_sum(cost, self.quantity)
    }

    /// Clearing the in-cart flag always clears `paid` as well.
    pub fn set_in_cart(&mut self, incart: bool) {
        self.incart = incart;
        if !incart {
            self.paid = false;
        }
    }

    /// Has no effect unless the item is in the cart.
    pub fn set_paid(&mut self, paid: bool) {
        self.paid = paid && self.incart;
    }

    /// In the cart and already paid for: drawn from no cash pool.
    pub fn is_settled(&self) -> bool {
        self.incart && self.paid
    }

    /// Number of nodes in this subtree, the item included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Item::node_count).sum::<usize>()
    }

    /// Depth of the subtree: 1 for a leaf.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Item::depth)
            .max()
            .unwrap_or(0)
    }

    /// Gives this node and all descendants fresh identifiers.
    pub fn reassign_ids(&mut self) {
        self.id = Uuid::new_v4();
        for child in &mut self.children {
            child.reassign_ids();
        }
    }

    /// Compares persisted fields only, recursively.
    pub fn same_content(&self, other: &Item) -> bool {
        self.name == other.name
            && (self.is_group() || self.cost == other.cost)
            && self.quantity == other.quantity
            && self.info == other.info
            && self.urls == other.urls
            && self.importance == other.importance
            && self.incart == other.incart
            && self.paid == other.paid
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(left, right)| left.same_content(right))
    }
}

fn line_sum(cost: i64, quantity: u32) -> i64 {
    if cost > 0 {
        cost.saturating_mul(i64::from(quantity))
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn importance_levels_are_clamped() {
        assert_eq!(Importance::from_level(-3), Importance::Unset);
        assert_eq!(Importance::from_level(2), Importance::Medium);
        assert_eq!(Importance::from_level(42), Importance::Highest);
        assert_eq!(Importance::High.level(), 3);
    }

    #[test]
    fn sum_ignores_unknown_costs() {
        assert_eq!(Item::new("Cable", 15).with_quantity(3).sum(), 45);
        assert_eq!(Item::new("Mystery", -1).with_quantity(3).sum(), 0);
        assert_eq!(Item::new("Free", 0).sum(), 0);
        assert_eq!(Item::new("None", 10).with_quantity(0).sum(), 0);
    }

    #[test]
    fn clearing_in_cart_clears_paid() {
        let mut item = Item::new("Lamp", 30).in_cart(true);
        assert!(item.is_settled());
        item.set_in_cart(false);
        assert!(!item.paid);

        item.set_paid(true);
        assert!(!item.paid, "paid requires the in-cart flag");
    }

    #[test]
    fn rolled_up_sum_walks_nested_groups() {
        let group = Item::group(
            "Workshop",
            vec![
                Item::new("Drill", 40),
                Item::group("Bits", vec![Item::new("Wood", 10), Item::new("Metal", 20)])
                    .with_quantity(2),
            ],
        );
        assert_eq!(group.rolled_up_sum(), 100);
        assert_eq!(group.node_count(), 5);
        assert_eq!(group.depth(), 3);
    }

    #[test]
    fn url_display_includes_label_when_present() {
        assert_eq!(ItemUrl::new("https://a.example", "").display(), "https://a.example");
        assert_eq!(
            ItemUrl::new("https://a.example", "shop").display(),
            "https://a.example (shop)"
        );
    }
}
