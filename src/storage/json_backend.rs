use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    domain::WishList,
    errors::{Result, WishError},
    utils::{
        paths::ensure_dir,
        persistence::{replace_file, write_file},
    },
};

use super::{
    document::{parse_document, render_document, DocumentLimits},
    BackupInfo, LoadMode, WishListStorage,
};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const DEFAULT_RETENTION: usize = 5;

/// JSON file storage. When a backups root is configured, every save first
/// copies the previous file into `<root>/<file stem>/`.
#[derive(Debug, Clone)]
pub struct JsonWishListStore {
    backups_root: Option<PathBuf>,
    retention: usize,
    limits: DocumentLimits,
}

impl Default for JsonWishListStore {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl JsonWishListStore {
    pub fn new(backups_root: Option<PathBuf>, retention: Option<usize>) -> Self {
        Self {
            backups_root,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
            limits: DocumentLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: DocumentLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> DocumentLimits {
        self.limits
    }

    fn backup_dir(&self, path: &Path) -> Result<PathBuf> {
        let root = self.backups_root.as_ref().ok_or_else(|| {
            WishError::StorageError("backups are not configured for this store".into())
        })?;
        Ok(root.join(canonical_name(path)))
    }

    fn backup_existing_file(&self, path: &Path) -> Result<()> {
        if self.backups_root.is_none() || !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(path)?;
        ensure_dir(&dir)?;
        let name = backup_file_name(path, None);
        fs::copy(path, dir.join(&name))?;
        debug!(backup = %name, "previous wish list preserved");
        self.prune_backups(path)
    }

    fn prune_backups(&self, path: &Path) -> Result<()> {
        let backups = self.list_backups(path)?;
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(&entry.path);
        }
        Ok(())
    }
}

impl WishListStorage for JsonWishListStore {
    fn load(&self, path: &Path, mode: LoadMode) -> Result<WishList> {
        if !path.exists() {
            return match mode {
                LoadMode::OpenOrCreate => {
                    info!(path = %path.display(), "no wish list file yet, starting empty");
                    Ok(WishList::new())
                }
                LoadMode::Reload => Err(WishError::StorageError(format!(
                    "wish list `{}` not found",
                    path.display()
                ))),
            };
        }
        load_wishlist_from_path(path, self.limits)
    }

    fn save(&self, list: &WishList, path: &Path) -> Result<()> {
        self.backup_existing_file(path)?;
        save_wishlist_to_path(list, path)?;
        info!(path = %path.display(), items = list.node_count(), "wish list saved");
        Ok(())
    }

    fn backup(&self, list: &WishList, path: &Path, note: Option<&str>) -> Result<BackupInfo> {
        let dir = self.backup_dir(path)?;
        ensure_dir(&dir)?;
        let name = backup_file_name(path, note);
        let backup_path = dir.join(&name);
        write_file(&backup_path, &render_document(list)?)?;
        self.prune_backups(path)?;
        Ok(BackupInfo {
            created_at: parse_backup_timestamp(&name),
            name,
            path: backup_path,
        })
    }

    fn list_backups(&self, path: &Path) -> Result<Vec<BackupInfo>> {
        let dir = self.backup_dir(path)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(BackupInfo {
                created_at: parse_backup_timestamp(&name),
                name,
                path,
            });
        }
        entries.sort_by_key(|entry| Reverse(entry.created_at));
        Ok(entries)
    }

    fn restore(&self, path: &Path, backup_name: &str) -> Result<WishList> {
        let backup_path = self.backup_dir(path)?.join(backup_name);
        if !backup_path.exists() {
            return Err(WishError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let list = load_wishlist_from_path(&backup_path, self.limits)?;
        fs::copy(&backup_path, path)?;
        info!(backup = backup_name, "wish list restored from backup");
        Ok(list)
    }
}

/// Writes the document next to `path` and renames it into place.
pub fn save_wishlist_to_path(list: &WishList, path: &Path) -> Result<()> {
    replace_file(path, &render_document(list)?)
}

/// Reads and validates a document. Document errors are prefixed with the file.
pub fn load_wishlist_from_path(path: &Path, limits: DocumentLimits) -> Result<WishList> {
    let data = fs::read_to_string(path)?;
    parse_document(&data, limits).map_err(|err| match err {
        WishError::Document(message) => {
            WishError::Document(format!("{}: {}", path.display(), message))
        }
        other => other,
    })
}

fn canonical_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let sanitized: String = stem
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '-',
        })
        .collect();
    if sanitized.trim_matches('-').is_empty() {
        "wishlist".into()
    } else {
        sanitized
    }
}

fn backup_file_name(path: &Path, note: Option<&str>) -> String {
    let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
    let mut stem = format!("{}_{}", canonical_name(path), timestamp);
    if let Some(label) = sanitize_backup_note(note) {
        stem.push('_');
        stem.push_str(&label);
    }
    format!("{}.{}", stem, BACKUP_EXTENSION)
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Finds the `<date>_<time>` pair inside a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let segments: Vec<&str> = trimmed.split('_').collect();
    segments.windows(2).rev().find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 6) {
            return None;
        }
        let raw = format!("{}{}", pair[0], pair[1]);
        NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
