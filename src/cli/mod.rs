pub mod output;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::{
    config::{Config, ConfigManager},
    core::session::WishListSession,
    domain::ItemId,
    errors::WishError,
    export::{export_csv_to_path, ExportOptions, ExportScope},
    storage::{JsonWishListStore, LoadMode},
    utils::paths,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] WishError),
    #[error("{0}")]
    Usage(String),
}

/// One parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Report {
        file: PathBuf,
    },
    Export {
        file: PathBuf,
        output: PathBuf,
        select: Vec<String>,
        labels: bool,
    },
    Refill {
        file: PathBuf,
    },
    Version,
    Help,
}

impl Command {
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let Some(command) = args.next() else {
            return Ok(Command::Help);
        };

        match command.as_str() {
            "report" => Ok(Command::Report {
                file: required(args.next(), "report <file.json>")?,
            }),
            "refill" => Ok(Command::Refill {
                file: required(args.next(), "refill <file.json>")?,
            }),
            "export" => {
                let file = required(args.next(), "export <file.json> <out.csv>")?;
                let output = required(args.next(), "export <file.json> <out.csv>")?;
                let mut select = Vec::new();
                let mut labels = false;
                while let Some(flag) = args.next() {
                    match flag.as_str() {
                        "--labels" => labels = true,
                        "--select" => match args.next() {
                            Some(name) => select.push(name),
                            None => return Err(CliError::Usage("--select needs an item name".into())),
                        },
                        other => return Err(CliError::Usage(format!("unknown option `{other}`"))),
                    }
                }
                Ok(Command::Export {
                    file,
                    output,
                    select,
                    labels,
                })
            }
            "version" | "--version" | "-V" => Ok(Command::Version),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(CliError::Usage(format!("unknown command `{other}`"))),
        }
    }
}

fn required(value: Option<String>, usage: &str) -> Result<PathBuf, CliError> {
    value
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Usage(format!("usage: wishcalc_cli {usage}")))
}

/// Entry point used by the `wishcalc_cli` binary.
pub fn run_cli<I, S>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let command = Command::parse(args)?;
    let manager = ConfigManager::from_env();
    let mut config = manager.load()?;
    output::configure_colors(&config);

    match command {
        Command::Help => output::print_usage(),
        Command::Version => println!("wishcalc {}", env!("CARGO_PKG_VERSION")),
        Command::Report { file } => {
            let session = open_existing(&manager, &mut config, &file)?;
            output::print_report(session.list());
            remember(&manager, &mut config, &file);
        }
        Command::Export {
            file,
            output: target,
            select,
            labels,
        } => {
            let mut session = open_existing(&manager, &mut config, &file)?;
            let mut missing = Vec::new();
            for name in &select {
                let ids = matching_ids(&session, name);
                if ids.is_empty() {
                    missing.push(name.clone());
                }
                for id in ids {
                    session.set_selected(id, true)?;
                }
            }
            if !missing.is_empty() {
                return Err(CliError::Usage(format!(
                    "no items named {}",
                    missing.join(", ")
                )));
            }
            let options = ExportOptions {
                human_readable: labels || config.export_human_readable,
                scope: if select.is_empty() {
                    ExportScope::All
                } else {
                    ExportScope::CheckedOnly
                },
            };
            let rows = export_csv_to_path(session.list(), options, &target)?;
            output::success(format!("Exported {rows} rows to {}", target.display()));
            remember(&manager, &mut config, &file);
        }
        Command::Refill { file } => {
            let mut session = open_existing(&manager, &mut config, &file)?;
            if !session.apply_refill() {
                output::warning("No monthly refill is set; nothing changed.");
                return Ok(());
            }
            session.save()?;
            output::success(format!(
                "Available cash is now {}",
                session.list().total_cash
            ));
            remember(&manager, &mut config, &file);
        }
    }
    Ok(())
}

fn store_for(config: &Config) -> JsonWishListStore {
    JsonWishListStore::new(
        Some(paths::backups_dir_in(&paths::app_dir())),
        Some(config.backup_retention),
    )
    .with_limits(config.document_limits())
}

/// Opens a file that must already exist. A file that has disappeared is
/// dropped from the recent list.
fn open_existing(
    manager: &ConfigManager,
    config: &mut Config,
    file: &Path,
) -> Result<WishListSession, CliError> {
    let mut session =
        WishListSession::new(Box::new(store_for(config))).with_limits(config.document_limits());
    if let Err(err) = session.open_with(file, LoadMode::Reload) {
        if !file.exists() && config.recent_files.iter().any(|recent| recent == file) {
            config.forget_recent(file);
            save_config(manager, config);
        }
        return Err(err.into());
    }
    Ok(session)
}

fn matching_ids(session: &WishListSession, name: &str) -> Vec<ItemId> {
    let mut ids = Vec::new();
    session.list().visit(|item, _| {
        if item.name == name {
            ids.push(item.id);
        }
    });
    ids
}

fn remember(manager: &ConfigManager, config: &mut Config, file: &Path) {
    config.touch_recent(file);
    save_config(manager, config);
}

fn save_config(manager: &ConfigManager, config: &Config) {
    if let Err(err) = manager.save(config) {
        warn!(error = %err, "could not update recent files");
    }
}
