//! Pure wish-list models. No I/O, no presentation concerns.

pub mod common;
pub mod item;
pub mod wishlist;

pub use common::{normalize_str, normalize_text, ItemId};
pub use item::{Importance, Item, ItemDerived, ItemUrl};
pub use wishlist::{CheckState, ItemPath, WishList, WishListTotals};
