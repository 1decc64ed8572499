use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::allocation::AllocationEngine;
use crate::core::services::{
    MoveDirection, MoveDistance, SelectionService, ServiceResult, TreeService,
};
use crate::core::validation::{ItemDraft, ValidItem};
use crate::domain::{normalize_str, CheckState, Item, ItemId, WishList, WishListTotals};
use crate::errors::{Result, WishError};
use crate::storage::{
    decode_clipboard, encode_clipboard, BackupInfo, DocumentLimits, LoadMode, WishListStorage,
};

/// Facade that owns the current wish list, its file and the storage backend.
///
/// Every mutation re-runs the allocation engine, so derived values are
/// always current when the caller reads them.
pub struct WishListSession {
    list: WishList,
    path: Option<PathBuf>,
    dirty: bool,
    limits: DocumentLimits,
    storage: Box<dyn WishListStorage>,
}

impl WishListSession {
    pub fn new(storage: Box<dyn WishListStorage>) -> Self {
        Self {
            list: WishList::new(),
            path: None,
            dirty: false,
            limits: DocumentLimits::default(),
            storage,
        }
    }

    pub fn with_limits(mut self, limits: DocumentLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn list(&self) -> &WishList {
        &self.list
    }

    pub fn totals(&self) -> WishListTotals {
        self.list.totals
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether persisted fields changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Opens `path`; a missing file starts an empty list bound to it.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<WishListTotals> {
        self.open_with(path, LoadMode::OpenOrCreate)
    }

    pub fn open_with(&mut self, path: impl Into<PathBuf>, mode: LoadMode) -> Result<WishListTotals> {
        let path = path.into();
        let list = self.storage.load(&path, mode)?;
        info!(path = %path.display(), "wish list opened");
        self.replace_list(list, Some(path));
        Ok(self.list.totals)
    }

    /// Re-reads the current file, discarding unsaved changes.
    pub fn reload(&mut self) -> Result<WishListTotals> {
        let path = self.require_path()?.to_path_buf();
        let list = self.storage.load(&path, LoadMode::Reload)?;
        self.replace_list(list, Some(path));
        Ok(self.list.totals)
    }

    pub fn save(&mut self) -> Result<()> {
        let path = self.require_path()?.to_path_buf();
        self.storage.save(&self.list, &path)?;
        self.dirty = false;
        Ok(())
    }

    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.storage.save(&self.list, &path)?;
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        self.storage.backup(&self.list, self.require_path()?, note)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        self.storage.list_backups(self.require_path()?)
    }

    pub fn restore_backup(&mut self, backup_name: &str) -> Result<WishListTotals> {
        let path = self.require_path()?.to_path_buf();
        let list = self.storage.restore(&path, backup_name)?;
        self.replace_list(list, Some(path));
        Ok(self.list.totals)
    }

    pub fn set_total_cash(&mut self, cash: i64) {
        self.list.set_total_cash(cash);
        self.touch(true);
    }

    pub fn set_refill_cash(&mut self, cash: i64) {
        self.list.set_refill_cash(cash);
        self.touch(true);
    }

    /// Adds the monthly refill to the available cash. Returns `false` when
    /// there is no refill configured.
    pub fn apply_refill(&mut self) -> bool {
        let applied = self.list.apply_refill();
        if applied {
            info!(total_cash = self.list.total_cash, "monthly refill applied");
            self.touch(true);
        }
        applied
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.list.comment = normalize_str(comment);
        self.dirty = true;
    }

    pub fn insert(
        &mut self,
        parent: Option<ItemId>,
        after: Option<ItemId>,
        item: Item,
    ) -> Result<ItemId> {
        let max_depth = self.limits.max_depth;
        self.mutate(true, |list| {
            TreeService::insert(list, parent, after, item, max_depth)
        })
    }

    pub fn append(&mut self, parent: Option<ItemId>, item: Item) -> Result<ItemId> {
        let max_depth = self.limits.max_depth;
        self.mutate(true, |list| TreeService::append(list, parent, item, max_depth))
    }

    /// Validates an editor draft and inserts the resulting item.
    pub fn insert_draft(
        &mut self,
        parent: Option<ItemId>,
        after: Option<ItemId>,
        draft: &ItemDraft,
    ) -> Result<ItemId> {
        let item = validate_draft(draft)?.into_item();
        self.insert(parent, after, item)
    }

    /// Validates an editor draft and applies it to an existing item.
    pub fn update_from_draft(&mut self, id: ItemId, draft: &ItemDraft) -> Result<()> {
        let valid = validate_draft(draft)?;
        self.mutate(true, |list| {
            TreeService::replace(list, id, valid.into_item())
        })
    }

    pub fn replace(&mut self, id: ItemId, replacement: Item) -> Result<()> {
        self.mutate(true, |list| TreeService::replace(list, id, replacement))
    }

    pub fn remove(&mut self, id: ItemId, treat_as_purchased: bool) -> Result<Item> {
        self.mutate(true, |list| TreeService::remove(list, id, treat_as_purchased))
    }

    /// Returns whether the item actually moved.
    pub fn move_item(
        &mut self,
        id: ItemId,
        direction: MoveDirection,
        distance: MoveDistance,
    ) -> Result<bool> {
        let moved = TreeService::move_sibling(&mut self.list, id, direction, distance)?;
        if moved.is_some() {
            self.touch(true);
        }
        Ok(moved.is_some())
    }

    pub fn can_move(&self, id: ItemId, direction: MoveDirection) -> bool {
        TreeService::can_move(&self.list, id, direction)
    }

    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> Result<()> {
        self.mutate(false, |list| SelectionService::set_selected(list, id, selected))
    }

    pub fn toggle_all(&mut self) -> CheckState {
        let state = SelectionService::toggle_all(&mut self.list);
        self.touch(false);
        state
    }

    pub fn set_in_cart(&mut self, id: ItemId, incart: bool) -> Result<()> {
        self.mutate(true, |list| SelectionService::set_in_cart(list, id, incart))
    }

    pub fn set_paid(&mut self, id: ItemId, paid: bool) -> Result<()> {
        self.mutate(true, |list| SelectionService::set_paid(list, id, paid))
    }

    /// Clipboard text for the given subtrees, in the order given.
    pub fn copy_to_clipboard(&self, ids: &[ItemId]) -> Result<String> {
        let items = ids
            .iter()
            .map(|id| {
                self.list
                    .find(*id)
                    .map(TreeService::copy_subtree)
                    .ok_or_else(|| WishError::InvalidInput(format!("Item not found: {id}")))
            })
            .collect::<Result<Vec<_>>>()?;
        encode_clipboard(&items)
    }

    /// Pastes clipboard items under `parent` after `after`, keeping their
    /// order. Foreign clipboard text pastes nothing.
    pub fn paste_from_clipboard(
        &mut self,
        text: &str,
        parent: Option<ItemId>,
        after: Option<ItemId>,
    ) -> Result<Vec<ItemId>> {
        let Some(items) = decode_clipboard(text, self.limits)? else {
            return Ok(Vec::new());
        };
        let max_depth = self.limits.max_depth;
        self.mutate(true, |list| {
            let mut anchor = after;
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                let id = TreeService::insert(list, parent, anchor, item, max_depth)?;
                anchor = Some(id);
                ids.push(id);
            }
            Ok(ids)
        })
    }

    fn mutate<T>(
        &mut self,
        persisted: bool,
        operation: impl FnOnce(&mut WishList) -> ServiceResult<T>,
    ) -> Result<T> {
        let value = operation(&mut self.list)?;
        self.touch(persisted);
        Ok(value)
    }

    fn touch(&mut self, persisted: bool) {
        if persisted {
            self.dirty = true;
        }
        AllocationEngine::recalculate(&mut self.list);
    }

    fn replace_list(&mut self, list: WishList, path: Option<PathBuf>) {
        self.list = list;
        self.path = path;
        self.dirty = false;
        AllocationEngine::recalculate(&mut self.list);
    }

    fn require_path(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .ok_or_else(|| WishError::InvalidInput("No file is associated with the wish list".into()))
    }
}

fn validate_draft(draft: &ItemDraft) -> Result<ValidItem> {
    draft.validate().map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        WishError::InvalidInput(messages.join("; "))
    })
}
