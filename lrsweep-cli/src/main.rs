//! lrsweep CLI
//!
//! Command-line interface for reconciling a Lightroom catalogue with the
//! folders it references.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let catalogue = cli.catalogue;
    let result = match cli.command {
        Commands::Info => commands::with_session(catalogue, commands::browse::run_info),
        Commands::Keywords => commands::with_session(catalogue, commands::browse::run_keywords),
        Commands::Tagged { keyword } => commands::with_session(catalogue, |session| {
            commands::browse::run_tagged(session, &keyword)
        }),
        Commands::Untagged => commands::with_session(catalogue, commands::browse::run_untagged),
        Commands::Collections => {
            commands::with_session(catalogue, commands::browse::run_collections)
        }
        Commands::Collection { name } => commands::with_session(catalogue, |session| {
            commands::browse::run_collection(session, &name)
        }),
        Commands::Files => commands::with_session(catalogue, commands::browse::run_files),
        Commands::Orphans {
            archive,
            delete,
            dry_run,
        } => commands::with_session(catalogue, |session| {
            commands::orphans::run_orphans(session, archive, delete, dry_run)
        }),
        Commands::Missing { remove, dry_run } => commands::with_session(catalogue, |session| {
            commands::missing::run_missing(session, remove, dry_run)
        }),
        Commands::Tables { column } => commands::with_session(catalogue, |session| {
            commands::tables::run_tables(session, &column)
        }),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Route `log` output to stdout.
///
/// Normal runs print bare messages so command output reads like plain text;
/// `--verbose` switches to timestamped records including debug level.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        });
    }
    builder.init();
}

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
