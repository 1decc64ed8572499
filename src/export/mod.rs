pub mod csv;

/// Which items go into an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    #[default]
    All,
    /// Checked items with all their descendants. Falls back to everything
    /// when nothing is checked.
    CheckedOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    /// Importance labels and "да"/"нет" instead of raw numbers and flags.
    pub human_readable: bool,
    pub scope: ExportScope,
}

pub use self::csv::{export_csv, export_csv_to_path, CSV_HEADERS};
