#![doc(test(attr(deny(warnings))))]

//! WishCalc plans purchases from a prioritized wish list: it distributes the
//! available cash over the items in list order and projects how many monthly
//! refills each remaining shortfall needs.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod storage;
pub mod utils;

pub use crate::core::{AllocationEngine, WishListSession};
pub use crate::domain::{Item, WishList};
pub use crate::errors::{Result, WishError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("WishCalc tracing initialized.");
    });
}
