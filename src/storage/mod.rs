pub mod clipboard;
pub mod document;
pub mod json_backend;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::WishList;
use crate::errors::Result;

/// How a missing file is treated on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// A missing file yields an empty list (first start).
    OpenOrCreate,
    /// The file was loaded before; a missing file is an error.
    Reload,
}

/// A backup snapshot of a wish-list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
}

/// Abstraction over persistence backends for wish-list documents.
pub trait WishListStorage: Send + Sync {
    fn load(&self, path: &Path, mode: LoadMode) -> Result<WishList>;
    fn save(&self, list: &WishList, path: &Path) -> Result<()>;
    fn backup(&self, list: &WishList, path: &Path, note: Option<&str>) -> Result<BackupInfo>;
    fn list_backups(&self, path: &Path) -> Result<Vec<BackupInfo>>;
    fn restore(&self, path: &Path, backup_name: &str) -> Result<WishList>;
}

pub use clipboard::{decode_clipboard, encode_clipboard, CLIPBOARD_MARKER};
pub use document::{
    parse_document, render_document, DocumentLimits, ItemRecord, UrlField, WishListDocument,
    DEFAULT_MAX_DEPTH,
};
pub use json_backend::{load_wishlist_from_path, save_wishlist_to_path, JsonWishListStore};
