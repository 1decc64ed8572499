use colored::Colorize;
use std::{env, fmt};

use crate::config::Config;
use crate::core::status::{MonthsWarning, NeedStatus};
use crate::domain::{Item, WishList};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

/// Disables colours when the user turned them off or `NO_COLOR` is set.
pub fn configure_colors(config: &Config) {
    if !config.ui_color_enabled || env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info | MessageKind::Section => "",
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => match build_label(kind) {
            "" => text,
            label => format!("{label} {text}"),
        },
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Error | MessageKind::Warning => eprintln!("{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn print_usage() {
    info(
        "Usage: wishcalc_cli <command>\n\
         Commands:\n  \
         report <file.json>\n  \
         export <file.json> <out.csv> [--labels] [--select <name>]...\n  \
         refill <file.json>\n  \
         version",
    );
}

/// Prints the recalculated list: cash summary first, then one line per item.
pub fn print_report(list: &WishList) {
    section("Wish list");
    for line in summary_lines(list) {
        info(line);
    }
    if !list.comment.is_empty() {
        info(format!("Comment: {}", list.comment));
    }
    section("Items");
    let mut lines = Vec::new();
    list.visit(|item, level| lines.push(item_line(item, level)));
    for line in lines {
        println!("{line}");
    }
}

pub fn summary_lines(list: &WishList) -> Vec<String> {
    let totals = &list.totals;
    let mut lines = vec![
        format!("Available: {}", list.total_cash),
        format!("Monthly refill: {}", list.refill_cash),
        format!("Left after the list: {}", totals.total_remain),
        format!("Items: {}", totals.item_count),
    ];
    if totals.in_cart_count > 0 {
        lines.push(format!(
            "In cart: {} for {}",
            totals.in_cart_count, totals.in_cart_sum
        ));
    }
    lines
}

/// One report line: indented name, sum and coverage status.
pub fn item_line(item: &Item, level: usize) -> String {
    let derived = &item.derived;
    let indent = "  ".repeat(level);
    let sum = if derived.sum > 0 {
        derived.sum.to_string()
    } else {
        "?".to_string()
    };

    let status = match NeedStatus::of(item) {
        NeedStatus::Enough => "covered".green().to_string(),
        NeedStatus::Unknown => "cost unknown".dimmed().to_string(),
        NeedStatus::Partial { .. } | NeedStatus::Empty => {
            let need = derived.need_cash.unwrap_or_default();
            let mut text = format!("need {need}");
            if let Some(months) = derived.need_months {
                text.push_str(&format!(", ~{months} mo"));
            }
            match MonthsWarning::of(item) {
                MonthsWarning::None => text.yellow().to_string(),
                _ => text.red().to_string(),
            }
        }
    };

    let mut flags = String::new();
    if item.is_settled() {
        flags.push_str(" [paid]");
    } else if item.incart {
        flags.push_str(" [cart]");
    }
    if !item.importance.label().is_empty() {
        flags.push_str(&format!(" ({})", item.importance.label()));
    }

    format!("{indent}{} = {sum}: {status}{flags}", item.name)
}
