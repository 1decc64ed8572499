pub mod selection_service;
pub mod tree_service;

pub use selection_service::SelectionService;
pub use tree_service::{MoveDirection, MoveDistance, TreeService};

use crate::domain::ItemId;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),
    #[error("{0}")]
    Invalid(String),
}
