//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lrsweep")]
#[command(about = "Reconcile a Lightroom catalogue with the files on disk", long_about = None)]
pub(crate) struct Cli {
    /// Catalogue file (.lrcat); defaults to catalogue.path in settings.toml
    #[arg(short, long, global = true)]
    pub catalogue: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the catalogue path and what it contains
    Info,

    /// List keywords with the number of tagged images
    Keywords,

    /// List images carrying a keyword (exact, case-sensitive match)
    Tagged {
        /// Keyword name
        keyword: String,
    },

    /// List images without any keyword
    Untagged,

    /// List collections that contain images
    Collections,

    /// List images in a collection (exact, case-sensitive match)
    Collection {
        /// Collection name
        name: String,
    },

    /// List every file the catalogue knows about
    Files,

    /// List files on disk that the catalogue does not know about
    #[command(group(ArgGroup::new("cleanup").args(["archive", "delete"])))]
    Orphans {
        /// Move orphans into an archive folder next to them
        #[arg(long)]
        archive: bool,

        /// Delete orphans from disk
        #[arg(long)]
        delete: bool,

        /// Show what would be moved or deleted without touching anything
        #[arg(short = 'n', long, requires = "cleanup")]
        dry_run: bool,
    },

    /// List catalogue entries whose file no longer exists
    Missing {
        /// Remove the catalogue records of missing files
        #[arg(long)]
        remove: bool,

        /// Show the deletion plan without modifying the catalogue
        #[arg(short = 'n', long, requires = "remove")]
        dry_run: bool,
    },

    /// List catalogue tables that have a given column
    Tables {
        /// Column name to look for
        #[arg(default_value = "image")]
        column: String,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the current settings
    Show,

    /// Print the settings file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("lrsweep").chain(args.iter().copied()))
    }

    #[test]
    fn dry_run_needs_an_action() {
        assert!(parse(&["orphans", "-n"]).is_err());
        assert!(parse(&["missing", "--dry-run"]).is_err());

        assert!(parse(&["orphans", "--archive", "-n"]).is_ok());
        assert!(parse(&["orphans", "--delete", "-n"]).is_ok());
        assert!(parse(&["missing", "--remove", "-n"]).is_ok());
        assert!(parse(&["orphans"]).is_ok());
    }

    #[test]
    fn archive_and_delete_are_exclusive() {
        assert!(parse(&["orphans", "--archive", "--delete"]).is_err());
    }

    #[test]
    fn catalogue_flag_is_global() {
        let cli = parse(&["files", "-c", "/pics/main.lrcat"]).unwrap();
        assert_eq!(cli.catalogue, Some(PathBuf::from("/pics/main.lrcat")));
        assert!(matches!(cli.command, Commands::Files));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
