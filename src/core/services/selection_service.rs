//! Check marks and cart state of individual items.

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{CheckState, ItemId, WishList};

pub struct SelectionService;

impl SelectionService {
    pub fn set_selected(list: &mut WishList, id: ItemId, selected: bool) -> ServiceResult<()> {
        let item = list.find_mut(id).ok_or(ServiceError::NotFound(id))?;
        item.selected = selected;
        Ok(())
    }

    pub fn set_all_selected(list: &mut WishList, selected: bool) {
        list.visit_mut(|item| item.selected = selected);
    }

    /// Handles a click on the tri-state "select all" control: a fully
    /// checked tree gets cleared, anything else gets fully checked.
    pub fn toggle_all(list: &mut WishList) -> CheckState {
        let all = list.totals.check_state() == CheckState::All;
        Self::set_all_selected(list, !all);
        if all {
            CheckState::None
        } else {
            CheckState::All
        }
    }

    pub fn set_in_cart(list: &mut WishList, id: ItemId, incart: bool) -> ServiceResult<()> {
        let item = list.find_mut(id).ok_or(ServiceError::NotFound(id))?;
        item.set_in_cart(incart);
        Ok(())
    }

    /// Marks a cart item as paid; rejected for items not in the cart.
    pub fn set_paid(list: &mut WishList, id: ItemId, paid: bool) -> ServiceResult<()> {
        let item = list.find_mut(id).ok_or(ServiceError::NotFound(id))?;
        if paid && !item.incart {
            return Err(ServiceError::Invalid(format!(
                "Item `{}` is not in the cart",
                item.name
            )));
        }
        item.set_paid(paid);
        Ok(())
    }

    /// Identifiers of all checked nodes in pre-order.
    pub fn checked_ids(list: &WishList) -> Vec<ItemId> {
        let mut ids = Vec::new();
        list.visit(|item, _| {
            if item.selected {
                ids.push(item.id);
            }
        });
        ids
    }
}
