//! Structural edits of the item tree.

use tracing::info;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Item, ItemDerived, ItemId, ItemPath, WishList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDistance {
    OneStep,
    ToEnd,
}

/// Insert, remove, reorder and replace operations on a [`WishList`].
///
/// None of these recalculate; callers run the allocation engine afterwards.
pub struct TreeService;

impl TreeService {
    /// Inserts `item` under `parent` (the root list when `None`), right
    /// after the sibling `after`, or at the front when `after` is `None`.
    /// The subtree must fit within `max_depth` nesting levels.
    pub fn insert(
        list: &mut WishList,
        parent: Option<ItemId>,
        after: Option<ItemId>,
        item: Item,
        max_depth: usize,
    ) -> ServiceResult<ItemId> {
        Self::validate_item(&item)?;
        let parent_path = Self::parent_path(list, parent)?;
        Self::check_depth(&parent_path, &item, max_depth)?;
        let siblings = Self::siblings_mut(list, &parent_path, parent)?;
        let index = match after {
            Some(after_id) => {
                siblings
                    .iter()
                    .position(|sibling| sibling.id == after_id)
                    .ok_or(ServiceError::NotFound(after_id))?
                    + 1
            }
            None => 0,
        };
        let id = item.id;
        siblings.insert(index, item);
        Ok(id)
    }

    /// Appends `item` as the last child of `parent` (or of the root list).
    pub fn append(
        list: &mut WishList,
        parent: Option<ItemId>,
        item: Item,
        max_depth: usize,
    ) -> ServiceResult<ItemId> {
        Self::validate_item(&item)?;
        let parent_path = Self::parent_path(list, parent)?;
        Self::check_depth(&parent_path, &item, max_depth)?;
        let siblings = Self::siblings_mut(list, &parent_path, parent)?;
        let id = item.id;
        siblings.push(item);
        Ok(id)
    }

    /// Detaches the node and its subtree. A purchased node's rolled-up sum is
    /// deducted from the available cash, which never drops below zero.
    pub fn remove(list: &mut WishList, id: ItemId, treat_as_purchased: bool) -> ServiceResult<Item> {
        let mut path = list.path_of(id).ok_or(ServiceError::NotFound(id))?;
        let index = path.pop().ok_or(ServiceError::NotFound(id))?;
        let siblings = list
            .children_at_mut(&path)
            .ok_or(ServiceError::NotFound(id))?;
        let removed = siblings.remove(index);

        if treat_as_purchased {
            let spent = removed.rolled_up_sum();
            list.total_cash = (list.total_cash - spent).max(0);
            info!(item = %removed.name, spent, "purchased item removed");
        }
        Ok(removed)
    }

    /// Reorders a node among its siblings. Returns the new index, or `None`
    /// when nothing changed.
    pub fn move_sibling(
        list: &mut WishList,
        id: ItemId,
        direction: MoveDirection,
        distance: MoveDistance,
    ) -> ServiceResult<Option<usize>> {
        let mut path = list.path_of(id).ok_or(ServiceError::NotFound(id))?;
        let index = path.pop().ok_or(ServiceError::NotFound(id))?;
        let siblings = list
            .children_at_mut(&path)
            .ok_or(ServiceError::NotFound(id))?;
        let count = siblings.len();
        if count < 2 {
            return Ok(None);
        }

        let target = match (direction, distance) {
            (MoveDirection::Up, MoveDistance::OneStep) => index.checked_sub(1),
            (MoveDirection::Down, MoveDistance::OneStep) => {
                (index + 1 < count).then_some(index + 1)
            }
            (MoveDirection::Up, MoveDistance::ToEnd) => (index != 0).then_some(0),
            (MoveDirection::Down, MoveDistance::ToEnd) => {
                (index != count - 1).then_some(count - 1)
            }
        };

        if let Some(target) = target {
            match distance {
                MoveDistance::OneStep => siblings.swap(index, target),
                MoveDistance::ToEnd => {
                    let node = siblings.remove(index);
                    siblings.insert(target, node);
                }
            }
        }
        Ok(target)
    }

    /// Whether [`TreeService::move_sibling`] would change anything.
    pub fn can_move(list: &WishList, id: ItemId, direction: MoveDirection) -> bool {
        let Some(mut path) = list.path_of(id) else {
            return false;
        };
        let Some(index) = path.pop() else {
            return false;
        };
        let count = Self::sibling_count(list, &path);
        match direction {
            MoveDirection::Up => index > 0,
            MoveDirection::Down => index + 1 < count,
        }
    }

    /// Replaces the persisted fields of a node with those of `replacement`.
    /// The node keeps its identifier and its children.
    pub fn replace(list: &mut WishList, id: ItemId, replacement: Item) -> ServiceResult<()> {
        Self::validate_item(&replacement)?;
        let node = list.find_mut(id).ok_or(ServiceError::NotFound(id))?;
        node.name = replacement.name;
        node.cost = replacement.cost;
        node.quantity = replacement.quantity;
        node.info = replacement.info;
        node.urls = replacement.urls;
        node.importance = replacement.importance;
        node.set_in_cart(replacement.incart);
        node.set_paid(replacement.paid);
        Ok(())
    }

    /// A "new item like this one": same field values, no children, no
    /// derived data and a fresh identifier.
    pub fn copy_template(item: &Item) -> Item {
        let mut copy = item.clone();
        copy.children.clear();
        copy.selected = false;
        copy.derived = ItemDerived::default();
        copy.reassign_ids();
        copy
    }

    /// Deep copy for clipboard export; every node gets a fresh identifier.
    pub fn copy_subtree(item: &Item) -> Item {
        let mut copy = item.clone();
        copy.reassign_ids();
        copy
    }

    fn validate_item(item: &Item) -> ServiceResult<()> {
        if item.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Item name must not be empty".into()));
        }
        Ok(())
    }

    /// `parent_path` holds one index per level above the new item.
    fn check_depth(parent_path: &[usize], item: &Item, max_depth: usize) -> ServiceResult<()> {
        let levels = parent_path.len() + item.depth();
        if levels > max_depth {
            return Err(ServiceError::Invalid(format!(
                "Too many nesting levels: {levels} (at most {max_depth})"
            )));
        }
        Ok(())
    }

    fn parent_path(list: &WishList, parent: Option<ItemId>) -> ServiceResult<ItemPath> {
        match parent {
            Some(parent_id) => list
                .path_of(parent_id)
                .ok_or(ServiceError::NotFound(parent_id)),
            None => Ok(Vec::new()),
        }
    }

    fn siblings_mut<'a>(
        list: &'a mut WishList,
        parent_path: &[usize],
        parent: Option<ItemId>,
    ) -> ServiceResult<&'a mut Vec<Item>> {
        list.children_at_mut(parent_path).ok_or_else(|| match parent {
            Some(parent_id) => ServiceError::NotFound(parent_id),
            None => ServiceError::Invalid("Root list unavailable".into()),
        })
    }

    fn sibling_count(list: &WishList, parent_path: &[usize]) -> usize {
        if parent_path.is_empty() {
            list.items.len()
        } else {
            list.item_at(parent_path)
                .map(|parent| parent.children.len())
                .unwrap_or(0)
        }
    }
}
