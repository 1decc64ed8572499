pub mod allocation;
pub mod services;
pub mod session;
pub mod status;
pub mod validation;

pub use allocation::{months_to_cover, AllocationEngine, CashPool};
pub use session::WishListSession;
pub use status::{MonthsWarning, NeedStatus};
pub use validation::{FieldError, ItemDraft, ItemField, ValidItem};
