use lrsweep_lib::{DeletionPlan, DeletionReport};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{log_paths, Session};
use crate::CliError;

/// List missing files, or purge their catalogue records.
pub(crate) fn run_missing(session: &Session, remove: bool, dry_run: bool) -> Result<(), CliError> {
    let library = &session.library;
    let missing = library.missing()?;

    if missing.is_empty() {
        log::info!(
            "{}",
            "No missing files.".if_supports_color(Stdout, |t| t.green())
        );
        return Ok(());
    }

    if !remove {
        log_paths(&missing);
        crate::log_blank();
        log::info!(
            "{} missing files. Re-run with --remove to purge them from the catalogue.",
            missing.len().if_supports_color(Stdout, |t| t.bold())
        );
        return Ok(());
    }

    if dry_run {
        let plan = library.plan_deletion(&missing)?;
        print_plan(&plan);
        crate::log_blank();
        log::info!(
            "{}",
            "Dry run: catalogue not modified.".if_supports_color(Stdout, |t| t.yellow())
        );
        return Ok(());
    }

    let report = library
        .remove_files(&missing)
        .map_err(|e| CliError::database(format!("Removal failed: {}", e)))?;
    print_report(&report);
    Ok(())
}

fn print_plan(plan: &DeletionPlan) {
    log::info!(
        "{}",
        "Deletion plan".if_supports_color(Stdout, |t| t.bold())
    );
    for record in &plan.records {
        log::info!("  {}", record.full_path());
    }
    log::info!(
        "  {} images, {} file records",
        plan.image_ids.len(),
        plan.file_ids.len()
    );
    log::info!("  Dependent tables: {}", plan.tables.join(", "));
    if plan.repairs_selection() {
        log::info!("  The current selection points at a removed image and will be reset");
    }
    if !plan.unresolved.is_empty() {
        log::warn!(
            "{} paths matched no catalogue record:",
            plan.unresolved.len()
        );
        for path in &plan.unresolved {
            log::warn!("  {}", path);
        }
    }
}

fn print_report(report: &DeletionReport) {
    log::info!(
        "Removed {} images and {} file records",
        report.images_removed.if_supports_color(Stdout, |t| t.bold()),
        report.files_removed.if_supports_color(Stdout, |t| t.bold())
    );
    for (table, rows) in &report.dependent_rows {
        if *rows > 0 {
            log::info!("  {}: {} rows", table, rows);
        }
    }
    if let Some(e) = &report.restore_error {
        log::warn!("Catalogue could not be reopened read-only: {}", e);
    }
    if report.selection_repaired {
        match report.selection_target {
            Some(id) => log::info!("  Selection reset to image {}", id),
            None => log::info!("  Selection cleared; the catalogue has no images left"),
        }
    }
}
