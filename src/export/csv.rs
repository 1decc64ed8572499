use std::{fs::File, io::Write, path::Path};

use tracing::info;

use crate::domain::{Item, WishList};
use crate::errors::Result;

use super::{ExportOptions, ExportScope};

pub const CSV_HEADERS: [&str; 9] = [
    "name",
    "cost",
    "quantity",
    "sum",
    "info",
    "url",
    "importance",
    "incart",
    "paid",
];

const INDENT: &str = "  ";
const URL_SEPARATOR: &str = "; ";
const YES: &str = "да";
const NO: &str = "нет";
const UNKNOWN_COST: &str = "?";

/// Writes the list as CSV in pre-order. Returns the number of data rows.
pub fn export_csv<W: Write>(list: &WishList, options: ExportOptions, writer: W) -> Result<usize> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    let checked_only = options.scope == ExportScope::CheckedOnly && has_checked(&list.items);
    let mut rows = 0;
    for item in &list.items {
        write_item(&mut csv_writer, item, 0, checked_only, options, &mut rows)?;
    }
    csv_writer.flush()?;
    Ok(rows)
}

pub fn export_csv_to_path(list: &WishList, options: ExportOptions, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    let rows = export_csv(list, options, file)?;
    info!(path = %path.display(), rows, "wish list exported");
    Ok(rows)
}

fn has_checked(items: &[Item]) -> bool {
    items
        .iter()
        .any(|item| item.selected || has_checked(&item.children))
}

fn write_item<W: Write>(
    writer: &mut ::csv::Writer<W>,
    item: &Item,
    depth: usize,
    checked_only: bool,
    options: ExportOptions,
    rows: &mut usize,
) -> Result<()> {
    if checked_only && !item.selected {
        for child in &item.children {
            write_item(writer, child, depth, checked_only, options, rows)?;
        }
        return Ok(());
    }

    writer.write_record(row(item, depth, options))?;
    *rows += 1;
    for child in &item.children {
        write_item(writer, child, depth + 1, false, options, rows)?;
    }
    Ok(())
}

fn row(item: &Item, depth: usize, options: ExportOptions) -> Vec<String> {
    let cost = if item.is_group() {
        item.children.iter().map(Item::rolled_up_sum).sum()
    } else {
        item.cost
    };
    let sum = item.rolled_up_sum();
    let urls = item
        .urls
        .iter()
        .map(|url| url.display())
        .collect::<Vec<_>>()
        .join(URL_SEPARATOR);

    let (cost, sum) = if options.human_readable && cost <= 0 {
        (UNKNOWN_COST.to_string(), UNKNOWN_COST.to_string())
    } else {
        (cost.to_string(), sum.to_string())
    };

    vec![
        format!("{}{}", INDENT.repeat(depth), item.name),
        cost,
        item.quantity.to_string(),
        sum,
        item.info.clone(),
        urls,
        importance_cell(item, options),
        flag_cell(item.incart, options),
        flag_cell(item.paid, options),
    ]
}

fn importance_cell(item: &Item, options: ExportOptions) -> String {
    if options.human_readable {
        item.importance.label().to_string()
    } else {
        item.importance.level().to_string()
    }
}

fn flag_cell(value: bool, options: ExportOptions) -> String {
    match (options.human_readable, value) {
        (true, true) => YES.to_string(),
        (true, false) => NO.to_string(),
        (false, true) => "1".to_string(),
        (false, false) => "0".to_string(),
    }
}
